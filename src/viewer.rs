//! User-paced stepping through rendered frames.

use ab_glyph::FontVec;
use image::RgbImage;
use rerun::RecordingStream;

use crate::error::Result;
use crate::visualization::{ImageJsonPair, fit_for_display, log_rendered_frame, render_pair};

pub const WINDOW_TITLE: &str = "Joint Visualization";

/// What the user did while a frame was on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerInput {
    /// Any key other than a quit key.
    Advance,
    /// `q` or `Esc`.
    Quit,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Displaying(usize),
    Terminated,
}

impl ViewerState {
    pub fn start(total: usize) -> ViewerState {
        if total == 0 {
            ViewerState::Terminated
        } else {
            ViewerState::Displaying(0)
        }
    }

    pub fn next(self, input: ViewerInput, total: usize) -> ViewerState {
        match (self, input) {
            (ViewerState::Displaying(i), ViewerInput::Advance) if i + 1 < total => {
                ViewerState::Displaying(i + 1)
            }
            _ => ViewerState::Terminated,
        }
    }
}

/// Something that can show a frame and wait for the user.
pub trait FrameDisplay {
    fn show(&mut self, image: &RgbImage, title: &str) -> Result<ViewerInput>;
}

/// Shows nothing and always advances.
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl FrameDisplay for HeadlessDisplay {
    fn show(&mut self, _image: &RgbImage, _title: &str) -> Result<ViewerInput> {
        Ok(ViewerInput::Advance)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerOutcome {
    pub shown: usize,
    pub skipped: usize,
    pub quit_early: bool,
}

/// Renders and shows each pair in order until the list ends or the user quits.
///
/// Pairs whose image or record cannot be decoded are logged and skipped.
pub fn run_viewer<D: FrameDisplay>(
    pairs: &[ImageJsonPair],
    display: &mut D,
    font: Option<&FontVec>,
    recording: Option<&RecordingStream>,
) -> Result<ViewerOutcome> {
    let total = pairs.len();
    let mut outcome = ViewerOutcome::default();
    let mut state = ViewerState::start(total);
    while let ViewerState::Displaying(idx) = state {
        let pair = &pairs[idx];
        let frame = match render_pair(pair, idx, total, font) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Skipping {}: {}", pair.image.display(), e);
                outcome.skipped += 1;
                state = state.next(ViewerInput::Advance, total);
                continue;
            }
        };
        if let Some(recording) = recording {
            log_rendered_frame(recording, "frames", idx, &frame)?;
        }
        let title = format!("{} - {} | {}", WINDOW_TITLE, frame.labels[0], frame.labels[1]);
        let input = display.show(&fit_for_display(frame.image), &title)?;
        outcome.shown += 1;
        state = state.next(input, total);
        if input != ViewerInput::Advance {
            outcome.quit_early = true;
        }
    }
    Ok(outcome)
}

#[cfg(feature = "window")]
pub use window::MinifbDisplay;

#[cfg(feature = "window")]
mod window {
    use image::RgbImage;
    use minifb::{Key, KeyRepeat, Window, WindowOptions};

    use super::{FrameDisplay, ViewerInput, WINDOW_TITLE};
    use crate::error::{DatasetError, Result};

    /// A minifb window that blocks on a key press per frame.
    #[derive(Default)]
    pub struct MinifbDisplay {
        window: Option<Window>,
        width: usize,
        height: usize,
    }

    fn is_quit_key(key: Key) -> bool {
        matches!(key, Key::Q | Key::Escape)
    }

    impl MinifbDisplay {
        pub fn new() -> MinifbDisplay {
            MinifbDisplay::default()
        }

        fn ensure_window(&mut self, width: usize, height: usize) -> Result<&mut Window> {
            let reopen = match &self.window {
                Some(w) => !w.is_open() || self.width != width || self.height != height,
                None => true,
            };
            if reopen {
                let mut window = Window::new(WINDOW_TITLE, width, height, WindowOptions::default())
                    .map_err(|e| {
                        DatasetError::Visualization(format!("Failed to create window: {}", e))
                    })?;
                window.set_target_fps(60);
                self.window = Some(window);
                self.width = width;
                self.height = height;
            }
            self.window
                .as_mut()
                .ok_or_else(|| DatasetError::Visualization("window not available".into()))
        }
    }

    impl FrameDisplay for MinifbDisplay {
        fn show(&mut self, image: &RgbImage, title: &str) -> Result<ViewerInput> {
            let (width, height) = (image.width() as usize, image.height() as usize);
            // 0x00RRGGBB
            let buffer: Vec<u32> = image
                .pixels()
                .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
                .collect();
            let window = self.ensure_window(width, height)?;
            window.set_title(title);

            while window.is_open() {
                window
                    .update_with_buffer(&buffer, width, height)
                    .map_err(|e| {
                        DatasetError::Visualization(format!("Failed to update window: {}", e))
                    })?;
                let keys = window.get_keys_pressed(KeyRepeat::No);
                if keys.iter().copied().any(is_quit_key) {
                    return Ok(ViewerInput::Quit);
                }
                if !keys.is_empty() {
                    return Ok(ViewerInput::Advance);
                }
            }
            Ok(ViewerInput::Closed)
        }
    }
}
