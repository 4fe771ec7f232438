#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{Rgb, RgbImage};
use pose_dataset_tools::layout;

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;

const MX_CELL: u32 = 1;
const MX_DOUBLE: u32 = 6;

pub enum MatValue {
    /// Column-major values.
    Matrix {
        rows: usize,
        cols: usize,
        data: Vec<f64>,
    },
    /// A `n x 1` cell array.
    Cell(Vec<MatValue>),
}

impl MatValue {
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> MatValue {
        let mut data = Vec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                data.push(f(r, c));
            }
        }
        MatValue::Matrix { rows, cols, data }
    }

    pub fn column(values: &[f64]) -> MatValue {
        MatValue::Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }
}

struct MatWriter {
    big_endian: bool,
}

impl MatWriter {
    fn u32(&self, v: u32) -> [u8; 4] {
        if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() }
    }

    fn element(&self, data_type: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        if !payload.is_empty() && payload.len() <= 4 && data_type != MI_MATRIX {
            out.extend(self.u32(((payload.len() as u32) << 16) | data_type));
            out.extend(payload);
            out.resize(8, 0);
            return out;
        }
        out.extend(self.u32(data_type));
        out.extend(self.u32(payload.len() as u32));
        out.extend(payload);
        while out.len() % 8 != 0 {
            out.push(0);
        }
        out
    }

    fn matrix(&self, name: &str, value: &MatValue) -> Vec<u8> {
        let (class, rows, cols) = match value {
            MatValue::Matrix { rows, cols, .. } => (MX_DOUBLE, *rows, *cols),
            MatValue::Cell(cells) => (MX_CELL, cells.len(), 1),
        };
        let mut payload = Vec::new();
        let mut flags = Vec::new();
        flags.extend(self.u32(class));
        flags.extend(self.u32(0));
        payload.extend(self.element(MI_UINT32, &flags));

        let mut dims = Vec::new();
        dims.extend(self.u32(rows as u32));
        dims.extend(self.u32(cols as u32));
        payload.extend(self.element(MI_INT32, &dims));
        payload.extend(self.element(MI_INT8, name.as_bytes()));

        match value {
            MatValue::Matrix { data, .. } => {
                let bytes: Vec<u8> = data
                    .iter()
                    .flat_map(|v| if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() })
                    .collect();
                payload.extend(self.element(MI_DOUBLE, &bytes));
            }
            MatValue::Cell(cells) => {
                for cell in cells {
                    payload.extend(self.matrix("", cell));
                }
            }
        }
        self.element(MI_MATRIX, &payload)
    }
}

/// Encodes variables as a MAT level 5 file.
pub fn mat_bytes(vars: &[(&str, MatValue)], compressed: bool, big_endian: bool) -> Vec<u8> {
    let writer = MatWriter { big_endian };
    let mut out = Vec::new();
    let mut text = b"MATLAB 5.0 MAT-file, written by pose-dataset-tools tests".to_vec();
    text.resize(116, b' ');
    out.extend(text);
    out.extend([0u8; 8]);
    if big_endian {
        out.extend([0x01, 0x00]);
        out.extend(b"MI");
    } else {
        out.extend([0x00, 0x01]);
        out.extend(b"IM");
    }
    for (name, value) in vars {
        let element = writer.matrix(name, value);
        if compressed {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&element).unwrap();
            let deflated = encoder.finish().unwrap();
            out.extend(writer.u32(MI_COMPRESSED));
            out.extend(writer.u32(deflated.len() as u32));
            out.extend(deflated);
        } else {
            out.extend(element);
        }
    }
    out
}

pub const KIND_2D: usize = 0;
pub const KIND_3D_CAMERA: usize = 1;
pub const KIND_3D_WORLD: usize = 2;

/// Distinct, strictly positive value for every matrix cell of the fixture.
pub fn coord(kind: usize, camera: usize, frame: usize, col: usize) -> f64 {
    (kind * 100_000 + camera * 10_000 + frame * 100 + col) as f64 + 0.25
}

/// Frame ids stored in the fixture's `frames` vector.
pub fn frame_id(frame_idx: usize) -> i64 {
    100 + frame_idx as i64
}

pub fn annotation_vars(cameras: usize, frames: usize) -> Vec<(&'static str, MatValue)> {
    let per_camera = |kind: usize, cols: usize| {
        MatValue::Cell(
            (0..cameras)
                .map(|cam| MatValue::from_fn(frames, cols, |f, c| coord(kind, cam, f, c)))
                .collect(),
        )
    };
    let frame_ids: Vec<f64> = (0..frames).map(|f| frame_id(f) as f64).collect();
    vec![
        ("frames", MatValue::column(&frame_ids)),
        ("annot2", per_camera(KIND_2D, 56)),
        ("annot3", per_camera(KIND_3D_CAMERA, 84)),
        ("univ_annot3", per_camera(KIND_3D_WORLD, 84)),
    ]
}

pub fn write_annotation(
    root: &Path,
    subject: u32,
    sequence: u32,
    cameras: usize,
    frames: usize,
    compressed: bool,
) -> PathBuf {
    let path = layout::annotation_path(root, subject, sequence);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, mat_bytes(&annotation_vars(cameras, frames), compressed, false)).unwrap();
    path
}

pub fn make_camera_dirs(root: &Path, subject: u32, sequence: u32, cameras: &[usize]) -> Vec<PathBuf> {
    cameras
        .iter()
        .map(|&cam| {
            let dir = layout::camera_frames_dir(root, subject, sequence, cam);
            std::fs::create_dir_all(&dir).unwrap();
            dir
        })
        .collect()
}

pub fn write_jpg(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([100, 100, 100]))
        .save(path)
        .unwrap();
}

pub fn touch(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

/// Sorted file names in a directory.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
