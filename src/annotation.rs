//! Per-(subject, sequence) ground truth loaded from `annot.mat`.

use std::path::Path;

use glam::{DVec2, DVec3};
use nalgebra::DMatrix;

use crate::error::{DatasetError, Result};
use crate::joints::{COLUMNS_2D, COLUMNS_3D, Joint};
use crate::matfile::{MatArray, MatFile};
use crate::record::{FrameRecord, JointAnnotation};

pub const FRAMES_VAR: &str = "frames";
pub const ANNOT2_VAR: &str = "annot2";
pub const ANNOT3_VAR: &str = "annot3";
pub const UNIV_ANNOT3_VAR: &str = "univ_annot3";

/// Joint coordinates for every camera of one sequence.
///
/// Each camera holds an `F x 56` matrix of interleaved `x, y` image positions
/// and two `F x 84` matrices of interleaved `x, y, z` positions, in camera
/// and world space.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub frames: Vec<i64>,
    pub annot2: Vec<DMatrix<f64>>,
    pub annot3: Vec<DMatrix<f64>>,
    pub univ_annot3: Vec<DMatrix<f64>>,
}

impl Annotation {
    pub fn load(path: &Path) -> Result<Annotation> {
        let mat = MatFile::open(path)?;
        Self::from_mat(&mat)
    }

    pub fn from_mat(mat: &MatFile) -> Result<Annotation> {
        let frames: Vec<i64> = numeric_var(mat, FRAMES_VAR)?
            .iter()
            .map(|f| *f as i64)
            .collect();
        let annot2 = camera_cells(mat, ANNOT2_VAR)?;
        let num_cameras = annot2.len();
        let annotation = Annotation {
            annot3: camera_cells(mat, ANNOT3_VAR)?,
            univ_annot3: camera_cells(mat, UNIV_ANNOT3_VAR)?,
            frames,
            annot2,
        };
        annotation.validate(num_cameras)?;
        Ok(annotation)
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn num_cameras(&self) -> usize {
        self.annot2.len()
    }

    fn validate(&self, num_cameras: usize) -> Result<()> {
        let n_frames = self.num_frames();
        let checks = [
            (ANNOT2_VAR, &self.annot2, COLUMNS_2D),
            (ANNOT3_VAR, &self.annot3, COLUMNS_3D),
            (UNIV_ANNOT3_VAR, &self.univ_annot3, COLUMNS_3D),
        ];
        for (var, per_camera, min_cols) in checks {
            if per_camera.len() < num_cameras {
                return Err(DatasetError::annotation(format!(
                    "'{}' has {} cameras, expected {}",
                    var,
                    per_camera.len(),
                    num_cameras
                )));
            }
            for (cam_idx, m) in per_camera.iter().take(num_cameras).enumerate() {
                if m.nrows() < n_frames || m.ncols() < min_cols {
                    return Err(DatasetError::annotation(format!(
                        "'{}' camera {} is {}x{}, expected at least {}x{}",
                        var,
                        cam_idx,
                        m.nrows(),
                        m.ncols(),
                        n_frames,
                        min_cols
                    )));
                }
            }
        }
        Ok(())
    }

    /// Unpacks every joint of one frame of one camera.
    pub fn frame_record(&self, camera: usize, frame_idx: usize) -> FrameRecord {
        let a2 = &self.annot2[camera];
        let a3 = &self.annot3[camera];
        let w3 = &self.univ_annot3[camera];
        let mut record = FrameRecord::new(self.frames[frame_idx], camera);
        for joint in Joint::ALL {
            let [x, y] = joint.columns_2d();
            let [cx, cy, cz] = joint.columns_3d();
            record.insert(
                joint,
                JointAnnotation {
                    p2d: DVec2::new(a2[(frame_idx, x)], a2[(frame_idx, y)]),
                    p3d_camera: DVec3::new(
                        a3[(frame_idx, cx)],
                        a3[(frame_idx, cy)],
                        a3[(frame_idx, cz)],
                    ),
                    p3d_world: DVec3::new(
                        w3[(frame_idx, cx)],
                        w3[(frame_idx, cy)],
                        w3[(frame_idx, cz)],
                    ),
                },
            );
        }
        record
    }
}

fn variable<'a>(mat: &'a MatFile, name: &str) -> Result<&'a MatArray> {
    mat.get(name)
        .ok_or_else(|| DatasetError::annotation(format!("missing variable '{name}'")))
}

fn numeric_var<'a>(mat: &'a MatFile, name: &str) -> Result<&'a DMatrix<f64>> {
    variable(mat, name)?
        .as_numeric()
        .ok_or_else(|| DatasetError::annotation(format!("'{name}' is not numeric")))
}

/// Per-camera matrices from column 0 of a `C x 1` cell array.
fn camera_cells(mat: &MatFile, name: &str) -> Result<Vec<DMatrix<f64>>> {
    let array = variable(mat, name)?;
    let MatArray::Cell { rows, .. } = array else {
        return Err(DatasetError::annotation(format!(
            "'{name}' is not a cell array"
        )));
    };
    (0..*rows)
        .map(|cam_idx| {
            array
                .cell(cam_idx, 0)
                .and_then(MatArray::as_numeric)
                .cloned()
                .ok_or_else(|| {
                    DatasetError::annotation(format!("'{name}' camera {cam_idx} is not numeric"))
                })
        })
        .collect()
}
