//! Skeleton overlay for frame images.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use glam::DVec2;
use image::{ImageReader, Rgb, RgbImage, imageops::FilterType};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rerun::RecordingStream;

use crate::error::{DatasetError, Result};
use crate::io::object_from_json;
use crate::joints::SKELETON;
use crate::layout::{self, CAMERA_PREFIX, FRAME_PREFIX, IMAGE_EXT, RECORD_EXT};
use crate::record::FrameRecord;

pub const MAX_DISPLAY_HEIGHT: u32 = 800;
pub const MAX_DISPLAY_WIDTH: u32 = 1200;

const LINE_THICKNESS: i32 = 2;
const MARKER_OUTER_RADIUS: i32 = 5;
const MARKER_INNER_RADIUS: i32 = 3;
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_SCALE: f32 = 20.0;
const LABEL_X: i32 = 10;
/// Baselines of the breadcrumb and progress labels.
const LABEL_BASELINES: [i32; 2] = [30, 60];

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImageJsonPair {
    pub image: PathBuf,
    pub json: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    /// Lexicographic by the full image path string.
    Sorted,
    /// Random; reproducible when seeded.
    Shuffled(Option<u64>),
}

/// Collects every `frame_*.jpg` with a same-stem JSON under `frames/*/*/camera_*`.
pub fn find_image_json_pairs(root: &Path) -> Result<Vec<ImageJsonPair>> {
    let frames_dir = layout::frames_root(root);
    if !frames_dir.is_dir() {
        return Err(DatasetError::MissingPath(frames_dir));
    }
    let camera_pattern = format!("{}/*/*/{}*", layout::glob_prefix(&frames_dir), CAMERA_PREFIX);

    let mut pairs = Vec::new();
    for camera_dir in layout::sorted_matches(&camera_pattern, Path::is_dir) {
        let image_pattern = format!(
            "{}/{}*.{}",
            layout::glob_prefix(&camera_dir),
            FRAME_PREFIX,
            IMAGE_EXT
        );
        for image in layout::sorted_matches(&image_pattern, Path::is_file) {
            let json = image.with_extension(RECORD_EXT);
            if json.is_file() {
                pairs.push(ImageJsonPair { image, json });
            }
        }
    }
    Ok(pairs)
}

pub fn order_pairs(pairs: &mut [ImageJsonPair], order: PairOrder) {
    match order {
        PairOrder::Sorted => {
            pairs.sort_by(|a, b| a.image.as_os_str().cmp(b.image.as_os_str()))
        }
        PairOrder::Shuffled(Some(seed)) => pairs.shuffle(&mut ChaCha8Rng::seed_from_u64(seed)),
        PairOrder::Shuffled(None) => pairs.shuffle(&mut rand::rng()),
    }
}

/// Integer pixel of a 2D joint, or `None` when either coordinate is not
/// strictly positive after truncation.
pub fn valid_pixel(p2d: DVec2) -> Option<(i32, i32)> {
    let (x, y) = (p2d.x as i32, p2d.y as i32);
    (x > 0 && y > 0).then_some((x, y))
}

fn draw_thick_line(img: &mut RgbImage, start: (i32, i32), end: (i32, i32), color: Rgb<u8>) {
    let offsets = -(LINE_THICKNESS / 2)..(LINE_THICKNESS + 1) / 2;
    for dx in offsets.clone() {
        for dy in offsets.clone() {
            draw_line_segment_mut(
                img,
                ((start.0 + dx) as f32, (start.1 + dy) as f32),
                ((end.0 + dx) as f32, (end.1 + dy) as f32),
                color,
            );
        }
    }
}

/// Draws bones, then joint markers, for every joint with a valid position.
pub fn draw_skeleton(img: &mut RgbImage, record: &FrameRecord) {
    for bone in SKELETON.iter() {
        let (Some(start), Some(end)) = (record.get(bone.from), record.get(bone.to)) else {
            continue;
        };
        if let (Some(start), Some(end)) = (valid_pixel(start.p2d), valid_pixel(end.p2d)) {
            draw_thick_line(img, start, end, Rgb(bone.color));
        }
    }

    for joint in record.joints.values() {
        if let Some(center) = valid_pixel(joint.p2d) {
            draw_filled_circle_mut(img, center, MARKER_OUTER_RADIUS, BLACK);
            draw_filled_circle_mut(img, center, MARKER_INNER_RADIUS, WHITE);
        }
    }
}

/// Black outline pass, then white fill, with the text baseline at `baseline`.
pub fn draw_outlined_text(img: &mut RgbImage, font: &FontVec, text: &str, x: i32, baseline: i32) {
    let scale = PxScale::from(LABEL_SCALE);
    let top = baseline - LABEL_SCALE as i32;
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx != 0 || dy != 0 {
                draw_text_mut(img, BLACK, x + dx, top + dy, scale, font, text);
            }
        }
    }
    draw_text_mut(img, WHITE, x, top, scale, font, text);
}

pub fn progress_label(index: usize, total: usize) -> String {
    format!("Image {} of {}", index + 1, total)
}

/// Size to display an image at, or `None` when it already fits.
pub fn display_size(width: u32, height: u32) -> Option<(u32, u32)> {
    if height <= MAX_DISPLAY_HEIGHT && width <= MAX_DISPLAY_WIDTH {
        return None;
    }
    let scale = (MAX_DISPLAY_HEIGHT as f64 / height as f64)
        .min(MAX_DISPLAY_WIDTH as f64 / width as f64);
    Some(((width as f64 * scale) as u32, (height as f64 * scale) as u32))
}

pub fn fit_for_display(img: RgbImage) -> RgbImage {
    match display_size(img.width(), img.height()) {
        Some((w, h)) => image::imageops::resize(&img, w, h, FilterType::Triangle),
        None => img,
    }
}

/// Loads the label font from `explicit`, or the first system font found.
pub fn load_font(explicit: Option<&Path>) -> Option<FontVec> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(p) => vec![p.to_path_buf()],
        None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };
    candidates.iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("using label font {}", path.display());
                Some(font)
            }
            Err(e) => {
                log::warn!("invalid font {}: {}", path.display(), e);
                None
            }
        }
    })
}

pub fn load_image(path: &Path) -> Result<RgbImage> {
    let malformed = |reason: String| DatasetError::MalformedRecord {
        path: path.to_path_buf(),
        reason,
    };
    let img = ImageReader::open(path)
        .map_err(|e| malformed(e.to_string()))?
        .decode()
        .map_err(|e| malformed(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// A decoded pair with the overlay drawn, at full resolution.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbImage,
    pub record: FrameRecord,
    pub labels: [String; 2],
}

pub fn render_pair(
    pair: &ImageJsonPair,
    index: usize,
    total: usize,
    font: Option<&FontVec>,
) -> Result<RenderedFrame> {
    let mut image = load_image(&pair.image)?;
    let record: FrameRecord = object_from_json(&pair.json)?;
    draw_skeleton(&mut image, &record);

    let labels = [layout::breadcrumb(&pair.image), progress_label(index, total)];
    if let Some(font) = font {
        for (text, baseline) in labels.iter().zip(LABEL_BASELINES) {
            draw_outlined_text(&mut image, font, text, LABEL_X, baseline);
        }
    }
    Ok(RenderedFrame {
        image,
        record,
        labels,
    })
}

fn rerun_err(e: rerun::RecordingStreamError) -> DatasetError {
    DatasetError::Visualization(e.to_string())
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

/// Logs the annotated image, valid 2D joints and the world-space skeleton.
pub fn log_rendered_frame(
    recording: &RecordingStream,
    topic: &str,
    index: usize,
    frame: &RenderedFrame,
) -> Result<()> {
    recording.set_time("image", rerun::TimeCell::from_sequence(index as i64));
    let (w, h) = frame.image.dimensions();
    recording
        .log(
            format!("{}/image", topic),
            &rerun::Image::from_rgb24(frame.image.as_raw().clone(), [w, h]),
        )
        .map_err(rerun_err)?;

    let (pts, labels): (Vec<_>, Vec<_>) = frame
        .record
        .joints
        .iter()
        .filter_map(|(name, j)| {
            valid_pixel(j.p2d).map(|(x, y)| ((x as f32, y as f32), name.clone()))
        })
        .unzip();
    recording
        .log(
            format!("{}/image/joints", topic),
            &rerun::Points2D::new(rerun_shift(&pts))
                .with_labels(labels)
                .with_radii([rerun::Radius::new_ui_points(5.0)]),
        )
        .map_err(rerun_err)?;

    let (strips, colors): (Vec<_>, Vec<_>) = SKELETON
        .iter()
        .filter_map(|bone| {
            let start = frame.record.get(bone.from)?.p3d_world;
            let end = frame.record.get(bone.to)?.p3d_world;
            let [r, g, b] = bone.color;
            Some((
                vec![start.as_vec3().to_array(), end.as_vec3().to_array()],
                rerun::Color::from_rgb(r, g, b),
            ))
        })
        .unzip();
    recording
        .log(
            format!("{}/world/skeleton", topic),
            &rerun::LineStrips3D::new(strips).with_colors(colors),
        )
        .map_err(rerun_err)?;
    Ok(())
}
