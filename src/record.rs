use glam::{DVec2, DVec3};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::joints::Joint;

/// Coordinates of one joint in one frame of one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAnnotation {
    /// Image position in pixels.
    #[serde(rename = "2d", deserialize_with = "nullable_vec2")]
    pub p2d: DVec2,
    #[serde(rename = "3d_camera", default, deserialize_with = "nullable_vec3")]
    pub p3d_camera: DVec3,
    #[serde(rename = "3d_world", default, deserialize_with = "nullable_vec3")]
    pub p3d_world: DVec3,
}

// serde_json writes non-finite floats as `null`; read them back as NaN.
fn nullable_vec2<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DVec2, D::Error> {
    let [x, y] = <[Option<f64>; 2]>::deserialize(deserializer)?;
    Ok(DVec2::new(x.unwrap_or(f64::NAN), y.unwrap_or(f64::NAN)))
}

fn nullable_vec3<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DVec3, D::Error> {
    let [x, y, z] = <[Option<f64>; 3]>::deserialize(deserializer)?;
    Ok(DVec3::new(
        x.unwrap_or(f64::NAN),
        y.unwrap_or(f64::NAN),
        z.unwrap_or(f64::NAN),
    ))
}

/// The per-(camera, frame) JSON record written by the extractor.
///
/// Joints keep insertion order so records are written in joint-table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: i64,
    pub camera_id: usize,
    pub joints: IndexMap<String, JointAnnotation>,
}

impl FrameRecord {
    pub fn new(frame: i64, camera_id: usize) -> FrameRecord {
        FrameRecord {
            frame,
            camera_id,
            joints: IndexMap::with_capacity(Joint::ALL.len()),
        }
    }

    pub fn insert(&mut self, joint: Joint, annotation: JointAnnotation) {
        self.joints.insert(joint.name().to_string(), annotation);
    }

    pub fn get(&self, joint: Joint) -> Option<&JointAnnotation> {
        self.joints.get(joint.name())
    }
}
