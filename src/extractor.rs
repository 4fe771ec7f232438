//! Unpacks `annot.mat` files into per-frame JSON records.

use std::fmt;
use std::path::Path;

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::annotation::Annotation;
use crate::error::{DatasetError, Result};
use crate::io::object_to_json;
use crate::layout::{self, ANNOTATION_FILE, SEQUENCE_PREFIX, SUBJECT_PREFIX};

const PROGRESS_LOG_INTERVAL: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectSequence {
    pub subject: u32,
    pub sequence: u32,
}

impl SubjectSequence {
    pub fn new(subject: u32, sequence: u32) -> SubjectSequence {
        SubjectSequence { subject, sequence }
    }
}

impl fmt::Display for SubjectSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject {:02}, Sequence {:02}", self.subject, self.sequence)
    }
}

/// What one (subject, sequence) extraction produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub cameras_written: Vec<usize>,
    pub cameras_skipped: Vec<usize>,
    pub records_written: usize,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<(SubjectSequence, ExtractionSummary)>,
    pub failed: Vec<(SubjectSequence, DatasetError)>,
}

impl BatchSummary {
    pub fn records_written(&self) -> usize {
        self.succeeded.iter().map(|(_, s)| s.records_written).sum()
    }
}

/// Finds every `subject_<id>/sequence_<id>` that holds an annotation file.
///
/// Directories with a non-numeric suffix or without `annot.mat` are logged
/// and skipped.
pub fn discover_subjects_and_sequences(root: &Path) -> Vec<SubjectSequence> {
    let mut found = Vec::new();
    for subject_dir in layout::child_dirs(root, SUBJECT_PREFIX) {
        let Some(subject) = layout::parse_dir_id(&layout::file_name_string(&subject_dir)) else {
            log::warn!("{}", DatasetError::InvalidDirectoryName(subject_dir));
            continue;
        };
        for sequence_dir in layout::child_dirs(&subject_dir, SEQUENCE_PREFIX) {
            if !sequence_dir.join(ANNOTATION_FILE).is_file() {
                log::warn!(
                    "Skipping directory without {}: {}",
                    ANNOTATION_FILE,
                    sequence_dir.display()
                );
                continue;
            }
            match layout::parse_dir_id(&layout::file_name_string(&sequence_dir)) {
                Some(sequence) => found.push(SubjectSequence::new(subject, sequence)),
                None => log::warn!("{}", DatasetError::InvalidDirectoryName(sequence_dir)),
            }
        }
    }
    found.sort();
    found
}

/// Discovered pairs narrowed to an optional subject and sequence.
pub fn select_pairs(
    root: &Path,
    subject: Option<u32>,
    sequence: Option<u32>,
) -> Result<Vec<SubjectSequence>> {
    let pairs: Vec<_> = discover_subjects_and_sequences(root)
        .into_iter()
        .filter(|p| subject.is_none_or(|s| p.subject == s))
        .filter(|p| sequence.is_none_or(|s| p.sequence == s))
        .collect();
    if pairs.is_empty() {
        return Err(DatasetError::EmptyDiscovery {
            root: root.to_path_buf(),
            what: "valid subjects and sequences".to_string(),
        });
    }
    Ok(pairs)
}

/// Writes one record per frame into an existing camera directory.
pub fn write_camera_records(
    annotation: &Annotation,
    camera: usize,
    camera_dir: &Path,
) -> Result<usize> {
    let n_frames = annotation.num_frames();
    (0..n_frames)
        .into_par_iter()
        .progress_count(n_frames as u64)
        .try_for_each(|frame_idx| -> Result<()> {
            let record = annotation.frame_record(camera, frame_idx);
            object_to_json(&layout::frame_record_path(camera_dir, frame_idx), &record)?;
            if frame_idx % PROGRESS_LOG_INTERVAL == 0 && frame_idx > 0 {
                log::debug!("  Camera {}: wrote frame {}/{}", camera, frame_idx, n_frames);
            }
            Ok(())
        })?;
    Ok(n_frames)
}

/// Extracts every camera of one (subject, sequence).
///
/// Cameras without a directory under `frames/` are skipped.
pub fn extract_all_joints(root: &Path, pair: SubjectSequence) -> Result<ExtractionSummary> {
    let annot_path = layout::annotation_path(root, pair.subject, pair.sequence);
    log::info!("Loading annotations from {}...", annot_path.display());
    let annotation = Annotation::load(&annot_path)?;
    let n_frames = annotation.num_frames();
    let n_cameras = annotation.num_cameras();
    log::info!("Found {} frames and {} cameras", n_frames, n_cameras);

    let mut summary = ExtractionSummary::default();
    for cam_idx in 0..n_cameras {
        let camera_dir = layout::camera_frames_dir(root, pair.subject, pair.sequence, cam_idx);
        if !camera_dir.is_dir() {
            log::info!(
                "Skipping camera {} - directory does not exist: {}",
                cam_idx,
                camera_dir.display()
            );
            summary.cameras_skipped.push(cam_idx);
            continue;
        }
        log::info!("Processing camera {}...", cam_idx);
        summary.records_written += write_camera_records(&annotation, cam_idx, &camera_dir)?;
        summary.cameras_written.push(cam_idx);
        log::info!("  Camera {}: Completed all {} frames", cam_idx, n_frames);
    }
    log::info!(
        "Finished extracting joint positions for subject {}, sequence {}",
        pair.subject,
        pair.sequence
    );
    Ok(summary)
}

/// Runs [`extract_all_joints`] for each pair, continuing past failures.
pub fn extract_batch(root: &Path, pairs: &[SubjectSequence]) -> BatchSummary {
    let mut batch = BatchSummary::default();
    for &pair in pairs {
        match extract_all_joints(root, pair) {
            Ok(summary) => batch.succeeded.push((pair, summary)),
            Err(e) => {
                log::error!("{}: {}", pair, e);
                batch.failed.push((pair, e));
            }
        }
    }
    batch
}
