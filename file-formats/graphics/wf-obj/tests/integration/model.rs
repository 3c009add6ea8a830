//! Tests for loading models with their material libraries

use crate::common::{ROBOT_MTL, ROBOT_OBJ, robot_dir, write_files};
use glam::Vec3;
use pretty_assertions::assert_eq;
use test_log::test;
use wf_obj::{
    DrawCall, ErrorKind, GroupBuffers, GroupKey, ImageTextureLoader, LoadOptions, MaterialId,
    Model, ObjError, RenderBackend,
};

#[derive(Default)]
struct RecordingBackend {
    uploads: Vec<(GroupKey, GroupBuffers)>,
    draws: Vec<(GroupKey, usize, Option<String>)>,
}

impl RenderBackend for RecordingBackend {
    fn upload(&mut self, key: GroupKey, buffers: &GroupBuffers) {
        self.uploads.push((key, buffers.clone()));
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        let texture = call
            .texture
            .and_then(|t| t.path.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        self.draws.push((call.key, call.vertex_count, texture));
    }
}

#[test]
fn test_load_robot_parts() {
    let (_dir, path) = robot_dir();
    let model = Model::load(&path).unwrap();

    let names: Vec<&str> = model.parts().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["body", "arm"]);
    assert_eq!(model.face_count(), 5);

    let body = model.part("body").unwrap();
    assert_eq!(body.groups.len(), 1);
    assert_eq!(body.face_count(), 2);
    assert_eq!(body.center(), Vec3::new(0.0, 1.0, 0.0));

    let arm = model.part("arm").unwrap();
    assert_eq!(arm.center(), Vec3::new(4.0, 0.5, 0.0));
    assert_eq!(model.part_index("arm"), Some(1));
}

#[test]
fn test_interleaved_materials_merge() {
    let (_dir, path) = robot_dir();
    let model = Model::load(&path).unwrap();
    let steel = model.materials().find("steel").unwrap();
    let skin = model.materials().find("skin").unwrap();

    let arm = model.part("arm").unwrap();
    assert_eq!(arm.groups.len(), 2);
    assert_eq!(arm.groups[0].material, steel);
    assert_eq!(arm.groups[0].faces.len(), 2);
    assert_eq!(arm.groups[1].material, skin);
    assert_eq!(arm.groups[1].faces.len(), 1);
}

#[test]
fn test_interleaved_materials_without_merge() {
    let (_dir, path) = robot_dir();
    let options = LoadOptions {
        merge_material_groups: false,
        ..LoadOptions::default()
    };
    let model = Model::load_with(&path, &options, &ImageTextureLoader).unwrap();

    let arm = model.part("arm").unwrap();
    assert_eq!(arm.groups.len(), 3);
    assert_eq!(model.face_count(), 5);
}

#[test]
fn test_materials_and_texture() {
    let (_dir, path) = robot_dir();
    let model = Model::load(&path).unwrap();

    assert_eq!(model.materials().len(), 3);
    assert_eq!(model.material(MaterialId::DEFAULT).unwrap().name, "Default");

    let skin = model.materials().find("skin").unwrap();
    let texture = model.materials().material_texture(skin).unwrap();
    assert_eq!((texture.width, texture.height), (4, 2));
    assert_eq!(&texture.pixels[..3], &[200, 150, 100]);

    let steel = model.material(model.materials().find("steel").unwrap()).unwrap();
    assert_eq!(steel.diffuse, Vec3::splat(0.5));
    assert_eq!(steel.specular, Vec3::ONE);
    assert_eq!(steel.transparency, 0.0);
    assert!(steel.texture.is_none());
}

#[test]
fn test_upload_and_draw() {
    let (_dir, path) = robot_dir();
    let model = Model::load(&path).unwrap();
    let mut backend = RecordingBackend::default();
    model.upload(&mut backend);
    model.draw(&mut backend);

    let keys: Vec<GroupKey> = backend.uploads.iter().map(|(key, _)| *key).collect();
    assert_eq!(
        keys,
        vec![GroupKey::new(0, 0), GroupKey::new(1, 0), GroupKey::new(1, 1)]
    );

    let (_, body) = &backend.uploads[0];
    assert_eq!(body.vertex_count(), 6);
    assert_eq!(&body.colors[..4], &[0.8, 0.6, 0.4, 1.0]);
    // Second triangle of the quad starts at its third corner, vt 1 1 flipped
    assert_eq!(&body.tex_coords[6..8], &[1.0, -1.0]);

    assert_eq!(
        backend.draws,
        vec![
            (GroupKey::new(0, 0), 6, Some("skin.png".to_string())),
            (GroupKey::new(1, 0), 6, None),
            (GroupKey::new(1, 1), 3, Some("skin.png".to_string())),
        ]
    );
}

#[test]
fn test_center_within_bounds() {
    let (_dir, path) = robot_dir();
    let model = Model::load(&path).unwrap();
    for part in model.parts() {
        let bounds = part.bounds();
        assert!(bounds.contains_point(part.center()), "part {}", part.name);
        for face in part.groups.iter().flat_map(|g| &g.faces) {
            for vertex in face.vertices() {
                assert!(bounds.contains_point(vertex));
            }
        }
    }
    assert!(
        model.part("body").unwrap().bounds().intersects(&model.bounds())
    );
}

#[test]
fn test_missing_model_file() {
    let dir = write_files(&[]);
    let err = Model::load(dir.path().join("absent.obj")).unwrap_err();
    assert!(matches!(err, ObjError::FileSystem(..)));
    assert_eq!(err.kind(), ErrorKind::FileSystem);
}

#[test]
fn test_missing_material_library() {
    let dir = write_files(&[("robot.obj", ROBOT_OBJ)]);
    let err = Model::load(dir.path().join("robot.obj")).unwrap_err();
    match err {
        ObjError::FileSystem(path, _) => assert!(path.ends_with("robot.mtl")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_texture_aborts_load() {
    let dir = write_files(&[("robot.obj", ROBOT_OBJ), ("robot.mtl", ROBOT_MTL)]);
    let err = Model::load(dir.path().join("robot.obj")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileSystem);
}

#[test]
fn test_unknown_material_reference() {
    let dir = write_files(&[(
        "broken.obj",
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl ghost\nf 1 2 3\n",
    )]);
    let err = Model::load(dir.path().join("broken.obj")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reference);
    assert!(err.to_string().contains("ghost"));
}

const PAINT_MTL: &str = "newmtl red\nKd 1 0 0\n\nnewmtl blue\nKd 0 0 1\n";

#[test]
fn test_material_carries_into_next_part() {
    let dir = write_files(&[
        (
            "parts.obj",
            "mtllib paint.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\n\
             g a\nusemtl red\nf 1 2 3\n\
             g b\nf 1 2 3\n\
             o c\nusemtl blue\nf 1 2 3\n",
        ),
        ("paint.mtl", PAINT_MTL),
    ]);
    let model = Model::load(dir.path().join("parts.obj")).unwrap();
    let red = model.materials().find("red").unwrap();
    let blue = model.materials().find("blue").unwrap();

    let materials: Vec<(&str, Vec<MaterialId>)> = model
        .parts()
        .iter()
        .map(|p| (p.name.as_str(), p.groups.iter().map(|g| g.material).collect()))
        .collect();
    assert_eq!(
        materials,
        vec![("a", vec![red]), ("b", vec![red]), ("c", vec![blue])]
    );
}

#[test]
fn test_usemtl_before_first_group() {
    let dir = write_files(&[
        (
            "arm.obj",
            "mtllib paint.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\ng arm\nf 1 2 3\n",
        ),
        ("paint.mtl", PAINT_MTL),
    ]);
    let model = Model::load(dir.path().join("arm.obj")).unwrap();
    let red = model.materials().find("red").unwrap();

    assert_eq!(model.parts().len(), 1);
    assert_eq!(model.part_index("arm"), Some(0));
    let arm = model.part("arm").unwrap();
    assert_eq!(arm.groups.len(), 1);
    assert_eq!(arm.groups[0].material, red);
}

#[test]
fn test_usemtl_before_bare_faces() {
    let dir = write_files(&[
        (
            "bare.obj",
            "mtllib paint.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl blue\nf 1 2 3\n",
        ),
        ("paint.mtl", PAINT_MTL),
    ]);
    let model = Model::load(dir.path().join("bare.obj")).unwrap();
    let blue = model.materials().find("blue").unwrap();

    assert_eq!(model.parts().len(), 1);
    assert_eq!(model.parts()[0].name, "");
    assert_eq!(model.parts()[0].groups[0].material, blue);
}
