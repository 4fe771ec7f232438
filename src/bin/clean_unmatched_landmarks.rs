use std::path::PathBuf;

use clap::Parser;
use pose_dataset_tools::cleaner::{CleanOptions, clean_unmatched_landmarks};
use pose_dataset_tools::init_logger;
use pose_dataset_tools::io::object_to_json;

/// Clean landmark JSON files that have no matching JPG frames
#[derive(Parser)]
#[command(version, about, author)]
struct CleanCli {
    /// Path to the dataset root directory
    #[arg(long = "dataset_path", default_value = "./")]
    dataset_path: PathBuf,

    /// Report what would be removed without deleting anything
    #[arg(long = "dry_run")]
    dry_run: bool,

    /// Write per-camera counts to this JSON file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    init_logger();
    let cli = CleanCli::parse();
    let options = CleanOptions {
        dry_run: cli.dry_run,
    };

    let report = match clean_unmatched_landmarks(&cli.dataset_path, &options) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    log::info!("Summary:");
    if report.dry_run {
        log::info!("Total JSON files that would be removed: {}", report.total_json_removed);
    } else {
        log::info!("Total JSON files removed: {}", report.total_json_removed);
    }
    log::info!(
        "Total JPG files without matching JSONs: {}",
        report.total_jpg_without_json
    );

    if let Some(path) = &cli.report {
        match object_to_json(path, &report) {
            Ok(()) => log::info!("Report written to {}", path.display()),
            Err(e) => log::error!("Failed to write report {}: {}", path.display(), e),
        }
    }
    log::info!("Landmark cleaning completed!");
}
