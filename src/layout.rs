//! On-disk naming convention shared by all tools.
//!
//! ```text
//! <root>/subject_<NN>/sequence_<NN>/annot.mat
//! <root>/frames/subject_<NN>/sequence_<NN>/camera_<NN>/frame_<NNNNNN>.{jpg,json}
//! ```

use std::path::{Path, PathBuf};

pub const FRAMES_DIR: &str = "frames";
pub const ANNOTATION_FILE: &str = "annot.mat";
pub const SUBJECT_PREFIX: &str = "subject_";
pub const SEQUENCE_PREFIX: &str = "sequence_";
pub const CAMERA_PREFIX: &str = "camera_";
pub const FRAME_PREFIX: &str = "frame_";
pub const IMAGE_EXT: &str = "jpg";
pub const RECORD_EXT: &str = "json";

pub fn subject_dir_name(subject: u32) -> String {
    format!("{}{:02}", SUBJECT_PREFIX, subject)
}

pub fn sequence_dir_name(sequence: u32) -> String {
    format!("{}{:02}", SEQUENCE_PREFIX, sequence)
}

pub fn camera_dir_name(camera: usize) -> String {
    format!("{}{:02}", CAMERA_PREFIX, camera)
}

pub fn frame_stem(frame_idx: usize) -> String {
    format!("{}{:06}", FRAME_PREFIX, frame_idx)
}

pub fn annotation_path(root: &Path, subject: u32, sequence: u32) -> PathBuf {
    root.join(subject_dir_name(subject))
        .join(sequence_dir_name(sequence))
        .join(ANNOTATION_FILE)
}

pub fn frames_root(root: &Path) -> PathBuf {
    root.join(FRAMES_DIR)
}

pub fn sequence_frames_dir(root: &Path, subject: u32, sequence: u32) -> PathBuf {
    frames_root(root)
        .join(subject_dir_name(subject))
        .join(sequence_dir_name(sequence))
}

pub fn camera_frames_dir(root: &Path, subject: u32, sequence: u32, camera: usize) -> PathBuf {
    sequence_frames_dir(root, subject, sequence).join(camera_dir_name(camera))
}

pub fn frame_record_path(camera_dir: &Path, frame_idx: usize) -> PathBuf {
    camera_dir.join(format!("{}.{}", frame_stem(frame_idx), RECORD_EXT))
}

/// Numeric id after the last `_` of a directory name, e.g. `subject_07` -> 7.
pub fn parse_dir_id(dir_name: &str) -> Option<u32> {
    dir_name.rsplit('_').next()?.parse().ok()
}

/// Escapes a directory for use as a glob prefix.
pub fn glob_prefix(dir: &Path) -> String {
    glob::Pattern::escape(&dir.to_string_lossy())
}

/// Sorted glob matches that pass `keep`.
pub fn sorted_matches(pattern: &str, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut paths: Vec<_> = match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).filter(|p| keep(p)).collect(),
        Err(e) => {
            log::error!("bad glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    paths.sort();
    paths
}

/// Sorted subdirectories of `dir` whose name starts with `prefix`.
pub fn child_dirs(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    sorted_matches(&format!("{}/{}*", glob_prefix(dir), prefix), Path::is_dir)
}

pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn file_stem_string(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// `subject_01/sequence_02/camera_03 - frame_000004` for an image path.
pub fn breadcrumb(image_path: &Path) -> String {
    let camera = image_path.parent();
    let sequence = camera.and_then(Path::parent);
    let subject = sequence.and_then(Path::parent);
    let name = |p: Option<&Path>| p.map(file_name_string).unwrap_or_default();
    format!(
        "{}/{}/{} - {}",
        name(subject),
        name(sequence),
        name(camera),
        file_stem_string(image_path).unwrap_or_default()
    )
}
