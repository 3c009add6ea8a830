//! Playback of several animations on one model
//!
//! [`AnimatedModel`] borrows a [`Model`] and any number of [`Animation`]s, each
//! with its own fractional frame cursor. On every draw the poses of all
//! attached animations are composed per part, in attachment order, and
//! applied about the part's center.
//!
//! ```rust,no_run
//! use wf_anm::{AnimatedModel, Animation};
//! use wf_obj::Model;
//! # fn run(backend: &mut impl wf_obj::RenderBackend) -> Result<(), Box<dyn std::error::Error>> {
//! let model = Model::load("assets/robot.obj")?;
//! let mut walk = Animation::load("assets/walk.anm")?;
//! walk.interpolate(2, true);
//!
//! let mut robot = AnimatedModel::new(&model);
//! robot.add_animation(&walk);
//! model.upload(backend);
//!
//! // once per frame
//! robot.update(0.5);
//! robot.draw(backend);
//! # Ok(())
//! # }
//! ```

use crate::animation::Animation;
use crate::frame::PartPose;
use crate::transform::{PivotTransform, pose_matrix};
use glam::Mat4;
use wf_obj::{Model, RenderBackend};

/// How a fractional cursor selects a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameSampling {
    /// Use the frame the cursor is in, ignoring the fraction
    #[default]
    Step,
    /// Blend the frame the cursor is in with the next one, wrapping to frame
    /// 0 after the last, by the cursor's fractional part
    Linear,
}

/// Options for controlling playback
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackOptions {
    /// Frames advanced per unit of time passed to [`AnimatedModel::update`]
    pub rate: f64,
    pub sampling: FrameSampling,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            sampling: FrameSampling::Step,
        }
    }
}

/// An attached animation and its cursor
#[derive(Debug, Clone, Copy)]
struct ActiveAnimation<'a> {
    animation: &'a Animation,
    /// Fractional frame position in `[0, frame_count)`
    position: f64,
}

impl ActiveAnimation<'_> {
    fn current_frame(&self) -> Option<usize> {
        let count = self.animation.frame_count();
        if count == 0 {
            return None;
        }
        Some((self.position.floor() as usize).min(count - 1))
    }

    /// Pose this animation gives `part` at the cursor
    fn sample(&self, part: &str, sampling: FrameSampling) -> Option<PartPose> {
        let current = self.current_frame()?;
        let pose = self.animation.pose(part, current);
        match sampling {
            FrameSampling::Step => pose.copied(),
            FrameSampling::Linear => {
                let next = (current + 1) % self.animation.frame_count();
                let next_pose = self.animation.pose(part, next);
                if pose.is_none() && next_pose.is_none() {
                    return None;
                }
                let from = pose.unwrap_or(&PartPose::IDENTITY);
                let to = next_pose.unwrap_or(&PartPose::IDENTITY);
                Some(from.lerp(to, self.position.fract() as f32))
            }
        }
    }
}

/// A model driven by concurrently playing animations
#[derive(Debug, Clone)]
pub struct AnimatedModel<'a> {
    model: &'a Model,
    active: Vec<ActiveAnimation<'a>>,
    /// Per part, translation to its center and back
    pivots: Vec<PivotTransform>,
    options: PlaybackOptions,
}

impl<'a> AnimatedModel<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self::with_options(model, PlaybackOptions::default())
    }

    pub fn with_options(model: &'a Model, options: PlaybackOptions) -> Self {
        let pivots = model
            .parts()
            .iter()
            .map(|part| PivotTransform::new(part.center()))
            .collect();
        Self {
            model,
            active: Vec::new(),
            pivots,
            options,
        }
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.options.rate = rate;
    }

    pub fn set_sampling(&mut self, sampling: FrameSampling) {
        self.options.sampling = sampling;
    }

    /// Attach an animation with its cursor at frame 0.
    ///
    /// Returns `false` if this exact animation is already attached.
    pub fn add_animation(&mut self, animation: &'a Animation) -> bool {
        if self.animation_exists(animation) {
            return false;
        }
        self.active.push(ActiveAnimation {
            animation,
            position: 0.0,
        });
        true
    }

    /// Detach an animation and drop its cursor.
    ///
    /// Returns `false` if it was not attached.
    pub fn remove_animation(&mut self, animation: &Animation) -> bool {
        let before = self.active.len();
        self.active
            .retain(|active| !std::ptr::eq(active.animation, animation));
        self.active.len() != before
    }

    /// Check if this exact animation instance is attached
    pub fn animation_exists(&self, animation: &Animation) -> bool {
        self.find(animation).is_some()
    }

    /// Attached animations in attachment order
    pub fn animations(&self) -> impl Iterator<Item = &'a Animation> + '_ {
        self.active.iter().map(|active| active.animation)
    }

    pub fn animation_count(&self) -> usize {
        self.active.len()
    }

    /// Cursor of an attached animation
    pub fn position(&self, animation: &Animation) -> Option<f64> {
        self.find(animation).map(|active| active.position)
    }

    /// Frame index the cursor of an attached animation is in
    pub fn current_frame(&self, animation: &Animation) -> Option<usize> {
        self.find(animation)?.current_frame()
    }

    /// Advance every cursor by `rate * time_delta` frames.
    ///
    /// A cursor reaching the frame count, or going below zero, restarts at
    /// exactly frame 0.
    pub fn update(&mut self, time_delta: f64) {
        let step = self.options.rate * time_delta;
        for active in &mut self.active {
            let count = active.animation.frame_count() as f64;
            let position = active.position + step;
            active.position = if position >= count || position < 0.0 || !position.is_finite() {
                0.0
            } else {
                position
            };
        }
    }

    /// Model-space transform of a part for the current cursors.
    ///
    /// Unknown part indices yield the identity.
    pub fn part_transform(&self, part_index: usize) -> Mat4 {
        let (Some(part), Some(pivot)) = (
            self.model.parts().get(part_index),
            self.pivots.get(part_index),
        ) else {
            return Mat4::IDENTITY;
        };

        let local = self
            .active
            .iter()
            .filter_map(|active| active.sample(&part.name, self.options.sampling))
            .fold(Mat4::IDENTITY, |acc, pose| acc * pose_matrix(&pose));
        pivot.apply(local)
    }

    /// Transforms of every part, in part order
    pub fn part_transforms(&self) -> Vec<Mat4> {
        (0..self.model.parts().len())
            .map(|index| self.part_transform(index))
            .collect()
    }

    /// Draw every part with its animated transform
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for (part_index, transform) in self.part_transforms().into_iter().enumerate() {
            self.model.draw_part(part_index, transform, backend);
        }
    }

    fn find(&self, animation: &Animation) -> Option<&ActiveAnimation<'a>> {
        self.active
            .iter()
            .find(|active| std::ptr::eq(active.animation, animation))
    }
}
