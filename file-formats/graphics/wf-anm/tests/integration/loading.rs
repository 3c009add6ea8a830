//! Tests for loading animation files

use crate::common::{BOB_ANM, SWING_ANM, write_files};
use glam::Vec3;
use pretty_assertions::assert_eq;
use test_log::test;
use wf_anm::{AnmError, Animation, ErrorKind, PartPose};

#[test]
fn test_load_from_file() {
    let (_dir, paths) = write_files(&[("bob.anm", BOB_ANM)]);
    let animation = Animation::load(&paths[0]).unwrap();

    assert_eq!(animation.frame_count(), 2);
    let names: Vec<&str> = animation.frame(1).unwrap().part_names().collect();
    assert_eq!(names, vec!["body", "arm"]);
    assert_eq!(
        animation.pose("body", 1),
        Some(&PartPose::new(Vec3::Y, Vec3::ZERO))
    );
}

#[test]
fn test_interpolate_loaded_animation() {
    let (_dir, paths) = write_files(&[("swing.anm", SWING_ANM)]);
    let mut animation = Animation::load(&paths[0]).unwrap();
    animation.interpolate(1, true);

    let angles: Vec<f32> = (0..animation.frame_count())
        .map(|i| animation.pose("arm", i).unwrap().rotation.z)
        .collect();
    assert_eq!(angles, vec![0.0, 45.0, 90.0, 45.0]);
}

#[test]
fn test_crlf_line_endings() {
    let (_dir, paths) = write_files(&[("swing.anm", "f\r\nt arm 1 0 0 0 0 0\r\n")]);
    let animation = Animation::load(&paths[0]).unwrap();
    assert_eq!(animation.pose("arm", 0).unwrap().translation, Vec3::X);
}

#[test]
fn test_missing_file() {
    let (dir, _) = write_files(&[]);
    let err = Animation::load(dir.path().join("absent.anm")).unwrap_err();
    assert!(matches!(err, AnmError::FileSystem(..)));
    assert_eq!(err.kind(), ErrorKind::FileSystem);
}

#[test]
fn test_missing_frame_marker() {
    let (_dir, paths) = write_files(&[("bad.anm", "# no frame\nt arm 0 0 0 0 0 0\n")]);
    let err = Animation::load(&paths[0]).unwrap_err();
    assert!(matches!(err, AnmError::MissingFrame { line: 2 }));
    assert_eq!(err.kind(), ErrorKind::Syntax);
}
