use std::path::PathBuf;

use clap::Parser;
use pose_dataset_tools::extractor::{extract_batch, select_pairs};
use pose_dataset_tools::init_logger;

/// Extract all joint positions from an MPI-INF-3DHP style dataset into per-frame JSON records
#[derive(Parser)]
#[command(version, about, author)]
struct ExtractCli {
    /// Path to the dataset root directory
    #[arg(long = "dataset_path", default_value = "./")]
    dataset_path: PathBuf,

    /// Only extract this subject id
    #[arg(long)]
    subject: Option<u32>,

    /// Only extract this sequence id
    #[arg(long)]
    sequence: Option<u32>,
}

fn main() {
    init_logger();
    let cli = ExtractCli::parse();
    let dataset_path = &cli.dataset_path;

    if !dataset_path.exists() {
        log::error!("Dataset path does not exist: {}", dataset_path.display());
        return;
    }

    let pairs = match select_pairs(dataset_path, cli.subject, cli.sequence) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    log::info!("Found {} subject/sequence combinations:", pairs.len());
    for pair in &pairs {
        log::info!("  - {}", pair);
    }

    let batch = extract_batch(dataset_path, &pairs);
    if batch.failed.is_empty() {
        log::info!(
            "All joint positions extracted successfully! ({} records)",
            batch.records_written()
        );
    } else {
        log::warn!(
            "Extracted {} of {} subject/sequence combinations ({} records); failed:",
            batch.succeeded.len(),
            pairs.len(),
            batch.records_written()
        );
        for (pair, e) in &batch.failed {
            log::warn!("  - {}: {}", pair, e);
        }
    }
}
