//! Keyframes: per-part poses keyed by part name

use glam::Vec3;
use std::collections::HashMap;

/// Rigid pose of one part within a frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartPose {
    /// Offset applied before rotating
    pub translation: Vec3,
    /// Euler angles in degrees, applied about Z, then Y, then X
    pub rotation: Vec3,
}

impl PartPose {
    /// No translation, no rotation
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    pub const fn new(translation: Vec3, rotation: Vec3) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Component-wise arithmetic mean of two poses
    pub fn average(&self, other: &Self) -> Self {
        Self {
            translation: (self.translation + other.translation) * 0.5,
            rotation: (self.rotation + other.rotation) * 0.5,
        }
    }

    /// Linear interpolation towards `other`, `t` in `[0, 1]`
    ///
    /// Euler angles are blended component-wise without taking the shortest arc.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.lerp(other.rotation, t),
        }
    }
}

/// One keyframe: part name to pose, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    entries: Vec<(String, PartPose)>,
    index: HashMap<String, usize>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pose for `part`.
    ///
    /// Returns `false` and keeps the existing pose when the part already has
    /// an entry in this frame.
    pub fn add(&mut self, part: impl Into<String>, pose: PartPose) -> bool {
        let part = part.into();
        if self.index.contains_key(&part) {
            return false;
        }
        self.index.insert(part.clone(), self.entries.len());
        self.entries.push((part, pose));
        true
    }

    /// Pose of `part`, `None` when the frame leaves it untouched
    pub fn pose(&self, part: &str) -> Option<&PartPose> {
        self.index.get(part).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, part: &str) -> bool {
        self.index.contains_key(part)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartPose)> {
        self.entries.iter().map(|(name, pose)| (name.as_str(), pose))
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame halfway between `self` and `next`, see [`Frame::blend`]
    pub fn midpoint(&self, next: &Self) -> Self {
        self.combine(next, PartPose::average)
    }

    /// Blend towards `next` by `t`.
    ///
    /// Parts are matched by name. The result holds every part of `self` in
    /// order, followed by the parts only `next` declares. A part missing on
    /// one side is blended against [`PartPose::IDENTITY`].
    pub fn blend(&self, next: &Self, t: f32) -> Self {
        self.combine(next, |a, b| a.lerp(b, t))
    }

    fn combine(&self, next: &Self, mix: impl Fn(&PartPose, &PartPose) -> PartPose) -> Self {
        let mut frame = Self::new();
        for (name, pose) in self.iter() {
            let other = next.pose(name).unwrap_or(&PartPose::IDENTITY);
            frame.add(name, mix(pose, other));
        }
        for (name, pose) in next.iter() {
            if !self.contains(name) {
                frame.add(name, mix(&PartPose::IDENTITY, pose));
            }
        }
        frame
    }
}
