mod common;

use common::{make_camera_dirs, touch, write_jpg};
use image::RgbImage;
use pose_dataset_tools::io::object_to_json;
use pose_dataset_tools::record::FrameRecord;
use pose_dataset_tools::viewer::{
    FrameDisplay, HeadlessDisplay, ViewerInput, ViewerState, run_viewer,
};
use pose_dataset_tools::visualization::ImageJsonPair;
use tempfile::TempDir;

/// Replays a fixed list of inputs and remembers what it was shown.
struct ScriptedDisplay {
    inputs: Vec<ViewerInput>,
    shown: Vec<((u32, u32), String)>,
}

impl ScriptedDisplay {
    fn new(inputs: &[ViewerInput]) -> Self {
        ScriptedDisplay {
            inputs: inputs.iter().rev().copied().collect(),
            shown: Vec::new(),
        }
    }
}

impl FrameDisplay for ScriptedDisplay {
    fn show(&mut self, image: &RgbImage, title: &str) -> pose_dataset_tools::Result<ViewerInput> {
        self.shown.push((image.dimensions(), title.to_string()));
        Ok(self.inputs.pop().unwrap_or(ViewerInput::Advance))
    }
}

fn pairs(root: &std::path::Path, sizes: &[(u32, u32)]) -> Vec<ImageJsonPair> {
    let dir = &make_camera_dirs(root, 1, 1, &[0])[0];
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            let pair = ImageJsonPair {
                image: dir.join(format!("frame_{i:06}.jpg")),
                json: dir.join(format!("frame_{i:06}.json")),
            };
            write_jpg(&pair.image, w, h);
            object_to_json(&pair.json, &FrameRecord::new(i as i64, 0)).unwrap();
            pair
        })
        .collect()
}

#[test]
fn test_state_transitions() {
    assert_eq!(ViewerState::start(0), ViewerState::Terminated);
    assert_eq!(ViewerState::start(3), ViewerState::Displaying(0));

    let s = ViewerState::Displaying(0);
    assert_eq!(s.next(ViewerInput::Advance, 3), ViewerState::Displaying(1));
    assert_eq!(s.next(ViewerInput::Quit, 3), ViewerState::Terminated);
    assert_eq!(s.next(ViewerInput::Closed, 3), ViewerState::Terminated);
    assert_eq!(
        ViewerState::Displaying(2).next(ViewerInput::Advance, 3),
        ViewerState::Terminated
    );
    assert_eq!(
        ViewerState::Terminated.next(ViewerInput::Advance, 3),
        ViewerState::Terminated
    );
}

#[test]
fn test_run_until_end() {
    let tmp = TempDir::new().unwrap();
    let pairs = pairs(tmp.path(), &[(16, 16), (1600, 1000), (640, 480)]);
    let mut display = ScriptedDisplay::new(&[]);
    let outcome = run_viewer(&pairs, &mut display, None, None).unwrap();
    assert_eq!(outcome.shown, 3);
    assert_eq!(outcome.skipped, 0);
    assert!(!outcome.quit_early);

    let sizes: Vec<_> = display.shown.iter().map(|(s, _)| *s).collect();
    assert_eq!(sizes, vec![(16, 16), (1200, 750), (640, 480)]);
    assert!(display.shown[1].1.contains("Image 2 of 3"));
    assert!(display.shown[1].1.contains("subject_01/sequence_01/camera_00 - frame_000001"));
}

#[test]
fn test_quit_stops_the_loop() {
    let tmp = TempDir::new().unwrap();
    let pairs = pairs(tmp.path(), &[(8, 8), (8, 8), (8, 8)]);
    let mut display = ScriptedDisplay::new(&[ViewerInput::Advance, ViewerInput::Quit]);
    let outcome = run_viewer(&pairs, &mut display, None, None).unwrap();
    assert_eq!(outcome.shown, 2);
    assert!(outcome.quit_early);
}

#[test]
fn test_bad_pairs_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let pairs = pairs(tmp.path(), &[(8, 8), (8, 8), (8, 8)]);
    touch(&pairs[0].json, "not json");
    touch(&pairs[2].image, "not a jpeg");

    let mut display = ScriptedDisplay::new(&[]);
    let outcome = run_viewer(&pairs, &mut display, None, None).unwrap();
    assert_eq!(outcome.shown, 1);
    assert_eq!(outcome.skipped, 2);
    assert!(display.shown[0].1.contains("Image 2 of 3"));
}

#[test]
fn test_headless_display_shows_everything() {
    let tmp = TempDir::new().unwrap();
    let pairs = pairs(tmp.path(), &[(8, 8), (8, 8)]);
    let outcome = run_viewer(&pairs, &mut HeadlessDisplay, None, None).unwrap();
    assert_eq!(outcome.shown, 2);

    let empty = run_viewer(&[], &mut HeadlessDisplay, None, None).unwrap();
    assert_eq!(empty.shown, 0);
}
