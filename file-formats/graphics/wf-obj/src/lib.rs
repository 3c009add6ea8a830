//! Parser for Wavefront OBJ models and MTL material libraries.
//!
//! A model is split into parts (`g`/`o` directives). Each part holds its faces
//! in material groups, and carries the center of its bounding box so it can
//! later be rotated in place. Geometry is handed to a caller supplied
//! [`RenderBackend`] as flat vertex buffers.
//!
//! # Examples
//!
//! ```no_run
//! use wf_obj::Model;
//!
//! let model = Model::load("assets/robot.obj")?;
//! for part in model.parts() {
//!     println!("{}: {} faces around {:?}", part.name, part.face_count(), part.center());
//! }
//! # Ok::<(), wf_obj::ObjError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod material;
pub mod model;
pub mod render;
pub mod texture;
pub mod tokenize;

pub use error::{ErrorKind, IndexKind, ObjError, Result};
pub use geometry::{Aabb, Face, Point3, calc_normal, reduce_to_unit};
pub use material::{Material, MaterialId, MaterialLibrary};
pub use model::{LoadOptions, MaterialGroup, Model, Part};
pub use render::{DrawCall, GroupBuffers, GroupKey, RenderBackend};
pub use texture::{ImageTextureLoader, PixelFormat, Texture, TextureId, TextureLoader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
