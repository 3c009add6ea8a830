//! Render backend interface
//!
//! The loader never talks to a graphics API. Instead every material group is
//! flattened into a [`GroupBuffers`] quadruple and handed to a
//! [`RenderBackend`] once, then drawn by key with a per-part transform.
//!
//! ```rust,no_run
//! use wf_obj::render::{DrawCall, GroupBuffers, GroupKey, RenderBackend};
//! use wf_obj::Model;
//!
//! #[derive(Default)]
//! struct Recorder {
//!     uploaded: usize,
//!     drawn: usize,
//! }
//!
//! impl RenderBackend for Recorder {
//!     fn upload(&mut self, _key: GroupKey, _buffers: &GroupBuffers) {
//!         self.uploaded += 1;
//!     }
//!
//!     fn draw(&mut self, call: &DrawCall<'_>) {
//!         self.drawn += call.vertex_count;
//!     }
//! }
//!
//! let model = Model::load("assets/robot.obj")?;
//! let mut backend = Recorder::default();
//! model.upload(&mut backend);
//! model.draw(&mut backend);
//! # Ok::<(), wf_obj::ObjError>(())
//! ```

use crate::material::Material;
use crate::model::MaterialGroup;
use crate::texture::Texture;
use glam::Mat4;

/// Identifies one uploaded material group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupKey {
    /// Index of the part inside the model
    pub part: usize,
    /// Index of the group inside the part
    pub group: usize,
}

impl GroupKey {
    pub const fn new(part: usize, group: usize) -> Self {
        Self { part, group }
    }
}

/// Four parallel vertex arrays describing one material group
///
/// Every face contributes three vertices. Positions and normals hold 3 floats
/// per vertex, colors 4 and texture coordinates 2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
}

impl GroupBuffers {
    /// Flatten `group` using `material` for the vertex colors.
    ///
    /// Colors are the diffuse color with alpha 1. Normals are per face, the
    /// same vector repeated on the face's three vertices.
    pub fn build(group: &MaterialGroup, material: &Material) -> Self {
        let vertex_count = group.faces.len() * 3;
        let mut buffers = Self {
            positions: Vec::with_capacity(vertex_count * 3),
            colors: Vec::with_capacity(vertex_count * 4),
            normals: Vec::with_capacity(vertex_count * 3),
            tex_coords: Vec::with_capacity(vertex_count * 2),
        };

        let color = material.vertex_color();
        for face in &group.faces {
            let normal = face.normal();
            for (position, tex_coord) in face.vertices().iter().zip(face.tex_coords()) {
                buffers.positions.extend_from_slice(&position.to_array());
                buffers.colors.extend_from_slice(&color);
                buffers.normals.extend_from_slice(&normal.to_array());
                buffers.tex_coords.extend_from_slice(&tex_coord.to_array());
            }
        }

        buffers
    }

    /// Number of vertices in the buffers
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// One draw request for an uploaded group
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub key: GroupKey,
    pub vertex_count: usize,
    /// Texture to bind for the draw, if the group's material has one
    pub texture: Option<&'a Texture>,
    /// Model-space transform of the owning part
    pub transform: Mat4,
}

/// Consumer of group geometry and draw requests
pub trait RenderBackend {
    /// Receive the buffers of a group, called once per group
    fn upload(&mut self, key: GroupKey, buffers: &GroupBuffers);

    /// Draw a previously uploaded group
    fn draw(&mut self, call: &DrawCall<'_>);
}
