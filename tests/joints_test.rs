use pose_dataset_tools::joints::{COLUMNS_2D, COLUMNS_3D, JOINT_COUNT, Joint, SKELETON};
use pose_dataset_tools::layout;
use std::collections::HashSet;
use std::path::Path;

#[test]
fn test_joint_table_order() {
    let names: Vec<_> = Joint::ALL.iter().map(|j| j.name()).collect();
    assert_eq!(
        names,
        vec![
            "spine3", "spine4", "spine2", "spine", "pelvis", "neck", "head", "head_top",
            "left_clavicle", "left_shoulder", "left_elbow", "left_wrist", "left_hand",
            "right_clavicle", "right_shoulder", "right_elbow", "right_wrist", "right_hand",
            "left_hip", "left_knee", "left_ankle", "left_foot", "left_toe", "right_hip",
            "right_knee", "right_ankle", "right_foot", "right_toe",
        ]
    );
    for (i, joint) in Joint::ALL.iter().enumerate() {
        assert_eq!(joint.index(), i);
        assert_eq!(Joint::from_name(joint.name()), Some(*joint));
    }
    assert_eq!(Joint::from_name("nose"), None);
}

#[test]
fn test_joint_columns() {
    assert_eq!(Joint::Spine3.columns_2d(), [0, 1]);
    assert_eq!(Joint::Pelvis.columns_2d(), [8, 9]);
    assert_eq!(Joint::Pelvis.columns_3d(), [12, 13, 14]);
    assert_eq!(Joint::RightToe.columns_2d(), [COLUMNS_2D - 2, COLUMNS_2D - 1]);
    assert_eq!(
        Joint::RightToe.columns_3d(),
        [COLUMNS_3D - 3, COLUMNS_3D - 2, COLUMNS_3D - 1]
    );
    assert_eq!(JOINT_COUNT, 28);
}

#[test]
fn test_skeleton_edges() {
    assert_eq!(SKELETON.len(), 27);
    let edges: HashSet<_> = SKELETON.iter().map(|b| (b.from, b.to)).collect();
    assert_eq!(edges.len(), SKELETON.len());
    assert!(edges.contains(&(Joint::Pelvis, Joint::Spine)));
    assert!(edges.contains(&(Joint::RightFoot, Joint::RightToe)));

    // every joint is an endpoint of some bone
    let touched: HashSet<_> = SKELETON.iter().flat_map(|b| [b.from, b.to]).collect();
    assert_eq!(touched.len(), JOINT_COUNT);

    let torso = SKELETON.iter().find(|b| b.to == Joint::Neck).unwrap();
    assert_eq!(torso.color, [0, 255, 0]);
    let head = SKELETON.iter().find(|b| b.to == Joint::HeadTop).unwrap();
    assert_eq!(head.color, [255, 255, 0]);
}

#[test]
fn test_layout_names() {
    assert_eq!(layout::subject_dir_name(1), "subject_01");
    assert_eq!(layout::sequence_dir_name(12), "sequence_12");
    assert_eq!(layout::camera_dir_name(3), "camera_03");
    assert_eq!(layout::frame_stem(42), "frame_000042");
    assert_eq!(
        layout::annotation_path(Path::new("/data"), 1, 2),
        Path::new("/data/subject_01/sequence_02/annot.mat")
    );
    assert_eq!(
        layout::camera_frames_dir(Path::new("/data"), 1, 2, 0),
        Path::new("/data/frames/subject_01/sequence_02/camera_00")
    );
    assert_eq!(
        layout::frame_record_path(Path::new("/c"), 7),
        Path::new("/c/frame_000007.json")
    );
}

#[test]
fn test_parse_dir_id() {
    assert_eq!(layout::parse_dir_id("subject_07"), Some(7));
    assert_eq!(layout::parse_dir_id("sequence_2"), Some(2));
    assert_eq!(layout::parse_dir_id("subject_abc"), None);
    assert_eq!(layout::parse_dir_id("subject_"), None);
}

#[test]
fn test_breadcrumb() {
    let path = Path::new("/d/frames/subject_01/sequence_02/camera_03/frame_000004.jpg");
    assert_eq!(
        layout::breadcrumb(path),
        "subject_01/sequence_02/camera_03 - frame_000004"
    );
}
