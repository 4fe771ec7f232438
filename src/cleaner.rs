//! Removes frame records whose image is gone.
//!
//! A JSON record survives only next to a JPG with the same stem. A JPG
//! without a record is counted but never touched.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DatasetError, Result};
use crate::layout::{
    self, CAMERA_PREFIX, FRAME_PREFIX, IMAGE_EXT, RECORD_EXT, SEQUENCE_PREFIX, SUBJECT_PREFIX,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Count orphaned records without deleting them.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CameraCleanReport {
    /// `subject_*/sequence_*/camera_*` relative to `frames`.
    pub camera: String,
    pub json_removed: usize,
    pub jpg_without_json: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub dry_run: bool,
    pub total_json_removed: usize,
    pub total_jpg_without_json: usize,
    pub sequences_without_cameras: Vec<String>,
    pub cameras: Vec<CameraCleanReport>,
}

fn frame_files(dir: &Path, ext: &str) -> Vec<PathBuf> {
    layout::sorted_matches(
        &format!("{}/{}*.{}", layout::glob_prefix(dir), FRAME_PREFIX, ext),
        Path::is_file,
    )
}

/// Reconciles one camera directory.
pub fn clean_camera_dir(camera_dir: &Path, dry_run: bool) -> Result<CameraCleanReport> {
    if !camera_dir.is_dir() {
        return Err(DatasetError::MissingPath(camera_dir.to_path_buf()));
    }
    let camera_id = layout::file_name_string(camera_dir);
    let jpg_stems: BTreeSet<String> = frame_files(camera_dir, IMAGE_EXT)
        .iter()
        .filter_map(|p| layout::file_stem_string(p))
        .collect();

    let mut json_removed = 0;
    for json_file in frame_files(camera_dir, RECORD_EXT) {
        let Some(stem) = layout::file_stem_string(&json_file) else {
            continue;
        };
        if jpg_stems.contains(&stem) {
            continue;
        }
        let name = layout::file_name_string(&json_file);
        if dry_run {
            log::info!("      Would remove {} (no matching JPG)", name);
            json_removed += 1;
            continue;
        }
        match std::fs::remove_file(&json_file) {
            Ok(()) => {
                log::info!("      Removing {} (no matching JPG)", name);
                json_removed += 1;
            }
            Err(e) => log::error!("      Failed to remove {}: {}", json_file.display(), e),
        }
    }

    let jpg_without_json = jpg_stems
        .iter()
        .filter(|stem| !camera_dir.join(format!("{}.{}", stem, RECORD_EXT)).exists())
        .count();

    log::info!(
        "      {}: Removed {} JSON files without matching JPGs",
        camera_id,
        json_removed
    );
    log::info!(
        "      {}: Found {} JPGs without matching JSONs",
        camera_id,
        jpg_without_json
    );
    Ok(CameraCleanReport {
        camera: camera_id,
        json_removed,
        jpg_without_json,
    })
}

/// Walks `frames/subject_*/sequence_*/camera_*` in sorted order.
///
/// Fails only when `frames` itself is missing; per-camera failures are logged
/// and skipped.
pub fn clean_unmatched_landmarks(root: &Path, options: &CleanOptions) -> Result<CleanReport> {
    let frames_dir = layout::frames_root(root);
    if !frames_dir.is_dir() {
        return Err(DatasetError::MissingPath(frames_dir));
    }

    let mut report = CleanReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    for subject_dir in layout::child_dirs(&frames_dir, SUBJECT_PREFIX) {
        let subject_id = layout::file_name_string(&subject_dir);
        log::info!("Processing {}...", subject_id);

        for sequence_dir in layout::child_dirs(&subject_dir, SEQUENCE_PREFIX) {
            let sequence_id = layout::file_name_string(&sequence_dir);
            log::info!("  Processing {}...", sequence_id);

            let camera_dirs = layout::child_dirs(&sequence_dir, CAMERA_PREFIX);
            if camera_dirs.is_empty() {
                log::warn!(
                    "    No camera directories found in {}",
                    sequence_dir.display()
                );
                report
                    .sequences_without_cameras
                    .push(format!("{}/{}", subject_id, sequence_id));
                continue;
            }
            log::info!("    Found {} camera directories", camera_dirs.len());

            for camera_dir in camera_dirs {
                log::info!("    Processing {}...", layout::file_name_string(&camera_dir));
                match clean_camera_dir(&camera_dir, options.dry_run) {
                    Ok(mut camera) => {
                        report.total_json_removed += camera.json_removed;
                        report.total_jpg_without_json += camera.jpg_without_json;
                        camera.camera = format!("{}/{}/{}", subject_id, sequence_id, camera.camera);
                        report.cameras.push(camera);
                    }
                    Err(e) => log::error!("    {}: {}", camera_dir.display(), e),
                }
            }
        }
    }
    Ok(report)
}
