//! The canonical 28-joint table and the skeletal graph drawn over it.
//!
//! A joint's position in [`Joint::ALL`] is its column block in the annotation
//! matrices: columns `2i, 2i+1` for 2D and `3i..3i+3` for 3D.

/// Number of joints in every annotation row.
pub const JOINT_COUNT: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    Spine3,
    Spine4,
    Spine2,
    Spine,
    Pelvis,
    Neck,
    Head,
    HeadTop,
    LeftClavicle,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,
    RightClavicle,
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,
    LeftToe,
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
    RightToe,
}

impl Joint {
    /// All joints in annotation column order.
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Spine3,
        Joint::Spine4,
        Joint::Spine2,
        Joint::Spine,
        Joint::Pelvis,
        Joint::Neck,
        Joint::Head,
        Joint::HeadTop,
        Joint::LeftClavicle,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::LeftHand,
        Joint::RightClavicle,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::RightHand,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::LeftFoot,
        Joint::LeftToe,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::RightFoot,
        Joint::RightToe,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used as the key in frame records.
    pub fn name(self) -> &'static str {
        match self {
            Joint::Spine3 => "spine3",
            Joint::Spine4 => "spine4",
            Joint::Spine2 => "spine2",
            Joint::Spine => "spine",
            Joint::Pelvis => "pelvis",
            Joint::Neck => "neck",
            Joint::Head => "head",
            Joint::HeadTop => "head_top",
            Joint::LeftClavicle => "left_clavicle",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::LeftHand => "left_hand",
            Joint::RightClavicle => "right_clavicle",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightElbow => "right_elbow",
            Joint::RightWrist => "right_wrist",
            Joint::RightHand => "right_hand",
            Joint::LeftHip => "left_hip",
            Joint::LeftKnee => "left_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::LeftFoot => "left_foot",
            Joint::LeftToe => "left_toe",
            Joint::RightHip => "right_hip",
            Joint::RightKnee => "right_knee",
            Joint::RightAnkle => "right_ankle",
            Joint::RightFoot => "right_foot",
            Joint::RightToe => "right_toe",
        }
    }

    pub fn from_name(name: &str) -> Option<Joint> {
        Joint::ALL.iter().copied().find(|j| j.name() == name)
    }

    /// Columns of the x and y coordinates in a 2D annotation row.
    pub fn columns_2d(self) -> [usize; 2] {
        let base = self.index() * 2;
        [base, base + 1]
    }

    /// Columns of the x, y and z coordinates in a 3D annotation row.
    pub fn columns_3d(self) -> [usize; 3] {
        let base = self.index() * 3;
        [base, base + 1, base + 2]
    }
}

/// Width of a 2D annotation row.
pub const COLUMNS_2D: usize = JOINT_COUNT * 2;
/// Width of a 3D annotation row.
pub const COLUMNS_3D: usize = JOINT_COUNT * 3;

/// One edge of the skeleton overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bone {
    pub from: Joint,
    pub to: Joint,
    /// RGB
    pub color: [u8; 3],
}

const TORSO: [u8; 3] = [0, 255, 0];
const HEAD: [u8; 3] = [255, 255, 0];
const LEFT_ARM: [u8; 3] = [0, 0, 255];
const RIGHT_ARM: [u8; 3] = [255, 0, 0];
const LEFT_LEG: [u8; 3] = [255, 0, 255];
const RIGHT_LEG: [u8; 3] = [0, 255, 255];

const fn bone(from: Joint, to: Joint, color: [u8; 3]) -> Bone {
    Bone { from, to, color }
}

pub const SKELETON: [Bone; 27] = [
    // torso
    bone(Joint::Pelvis, Joint::Spine, TORSO),
    bone(Joint::Spine, Joint::Spine2, TORSO),
    bone(Joint::Spine2, Joint::Spine3, TORSO),
    bone(Joint::Spine3, Joint::Spine4, TORSO),
    bone(Joint::Spine4, Joint::Neck, TORSO),
    // head
    bone(Joint::Neck, Joint::Head, HEAD),
    bone(Joint::Head, Joint::HeadTop, HEAD),
    // left arm
    bone(Joint::Spine4, Joint::LeftClavicle, LEFT_ARM),
    bone(Joint::LeftClavicle, Joint::LeftShoulder, LEFT_ARM),
    bone(Joint::LeftShoulder, Joint::LeftElbow, LEFT_ARM),
    bone(Joint::LeftElbow, Joint::LeftWrist, LEFT_ARM),
    bone(Joint::LeftWrist, Joint::LeftHand, LEFT_ARM),
    // right arm
    bone(Joint::Spine4, Joint::RightClavicle, RIGHT_ARM),
    bone(Joint::RightClavicle, Joint::RightShoulder, RIGHT_ARM),
    bone(Joint::RightShoulder, Joint::RightElbow, RIGHT_ARM),
    bone(Joint::RightElbow, Joint::RightWrist, RIGHT_ARM),
    bone(Joint::RightWrist, Joint::RightHand, RIGHT_ARM),
    // left leg
    bone(Joint::Pelvis, Joint::LeftHip, LEFT_LEG),
    bone(Joint::LeftHip, Joint::LeftKnee, LEFT_LEG),
    bone(Joint::LeftKnee, Joint::LeftAnkle, LEFT_LEG),
    bone(Joint::LeftAnkle, Joint::LeftFoot, LEFT_LEG),
    bone(Joint::LeftFoot, Joint::LeftToe, LEFT_LEG),
    // right leg
    bone(Joint::Pelvis, Joint::RightHip, RIGHT_LEG),
    bone(Joint::RightHip, Joint::RightKnee, RIGHT_LEG),
    bone(Joint::RightKnee, Joint::RightAnkle, RIGHT_LEG),
    bone(Joint::RightAnkle, Joint::RightFoot, RIGHT_LEG),
    bone(Joint::RightFoot, Joint::RightToe, RIGHT_LEG),
];
