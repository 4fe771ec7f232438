use std::path::PathBuf;

use clap::Parser;
use pose_dataset_tools::init_logger;
use pose_dataset_tools::viewer::{FrameDisplay, HeadlessDisplay, run_viewer};
use pose_dataset_tools::visualization::{PairOrder, find_image_json_pairs, load_font, order_pairs};

/// Visualize joint annotations on images
#[derive(Parser)]
#[command(version, about, author)]
struct VisualizeCli {
    /// Path to the dataset root directory
    #[arg(long = "dataset_path", default_value = "./")]
    dataset_path: PathBuf,

    /// Shuffle images for random visualization
    #[arg(long)]
    shuffle: bool,

    /// Seed for a reproducible shuffle
    #[arg(long, requires = "shuffle")]
    seed: Option<u64>,

    /// TrueType font for the overlay labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also record every rendered frame into this .rrd file
    #[arg(long)]
    rerun: Option<PathBuf>,

    /// Do not open a window (useful with --rerun)
    #[arg(long)]
    headless: bool,
}

fn run<D: FrameDisplay>(
    cli: &VisualizeCli,
    display: &mut D,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pairs = match find_image_json_pairs(&cli.dataset_path) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::error!("{}", e);
            return Ok(());
        }
    };
    if pairs.is_empty() {
        log::error!("No image-JSON pairs found!");
        return Ok(());
    }
    log::info!("Found {} image-JSON pairs", pairs.len());

    if cli.shuffle {
        order_pairs(&mut pairs, PairOrder::Shuffled(cli.seed));
        log::info!("Images shuffled for random viewing");
    } else {
        order_pairs(&mut pairs, PairOrder::Sorted);
        log::info!("Images sorted by path");
    }

    let font = load_font(cli.font.as_deref());
    if font.is_none() {
        log::warn!("No label font found; labels are shown in the window title");
    }
    let recording = match &cli.rerun {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("visualize_joints").save(path)?),
        None => None,
    };

    log::info!("Visualization Controls:");
    log::info!("  Any key: Next image");
    log::info!("  Q / Esc: Quit");

    let outcome = run_viewer(&pairs, display, font.as_ref(), recording.as_ref())?;
    log::info!(
        "Shown {} images, skipped {}{}",
        outcome.shown,
        outcome.skipped,
        if outcome.quit_early { " (quit)" } else { "" }
    );
    Ok(())
}

#[cfg(feature = "window")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = VisualizeCli::parse();
    if cli.headless {
        run(&cli, &mut HeadlessDisplay)
    } else {
        run(&cli, &mut pose_dataset_tools::viewer::MinifbDisplay::new())
    }
}

#[cfg(not(feature = "window"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let cli = VisualizeCli::parse();
    if !cli.headless {
        log::warn!("built without the `window` feature; running headless");
    }
    run(&cli, &mut HeadlessDisplay)
}
