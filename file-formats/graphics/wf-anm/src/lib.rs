//! Keyframe animation for part-based Wavefront models.
//!
//! An animation file is a list of frames, each giving a translation and an
//! Euler rotation for some of a model's named parts:
//!
//! ```text
//! f
//! t arm 0 0 0 0 0 0
//! f
//! t arm 0 0.5 0 0 0 45
//! ```
//!
//! Frames can be densified with [`Animation::interpolate`] and played back on
//! a [`wf_obj::Model`] through [`AnimatedModel`].
//!
//! # Examples
//!
//! ```no_run
//! use wf_anm::Animation;
//!
//! let mut wave = Animation::load("assets/wave.anm")?;
//! wave.interpolate(1, true);
//! println!("{} frames", wave.frame_count());
//! # Ok::<(), wf_anm::AnmError>(())
//! ```

#![forbid(unsafe_code)]

pub mod animation;
pub mod error;
pub mod frame;
pub mod playback;
pub mod transform;

pub use animation::Animation;
pub use error::{AnmError, ErrorKind, Result};
pub use frame::{Frame, PartPose};
pub use playback::{AnimatedModel, FrameSampling, PlaybackOptions};
pub use transform::{PivotTransform, pose_matrix};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
