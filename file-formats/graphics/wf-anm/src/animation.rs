//! Keyframe animations: loading and interpolation

use crate::error::{AnmError, Result};
use crate::frame::{Frame, PartPose};
use glam::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use wf_obj::tokenize::{parse_triple, split_line_whitespace};

/// Number of fields after `t`: part name plus six numbers
const TRANSFORM_FIELDS: usize = 7;

/// An ordered sequence of keyframes
///
/// Frame 0 is the initial pose. The frame count is the period playback wraps
/// around.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    frames: Vec<Frame>,
}

impl Animation {
    /// Create an animation from already built frames
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Load an animation from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AnmError::FileSystem(path.to_owned(), e))?;
        log::debug!("Loading animation {}", path.display());
        Self::parse(BufReader::new(file))
    }

    /// Parse animation directives from a reader
    ///
    /// `f` starts a frame and `t <part> tx ty tz rx ry rz` adds a pose to it.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut frames: Vec<Frame> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let tokens = split_line_whitespace(&line);
            let Some(directive) = tokens.first() else {
                continue;
            };
            if directive.starts_with('#') {
                continue;
            }

            match directive.as_str() {
                "f" => frames.push(Frame::new()),
                "t" => {
                    let frame = frames
                        .last_mut()
                        .ok_or(AnmError::MissingFrame { line: line_no })?;
                    let (name, pose) = parse_transform(line_no, &tokens)?;
                    if !frame.add(name, pose) {
                        log::warn!(
                            "Part '{}' appears twice in frame {} (line {}), keeping the first pose",
                            name,
                            frames.len() - 1,
                            line_no
                        );
                    }
                }
                other => {
                    log::trace!("Ignoring animation directive '{}' on line {}", other, line_no);
                }
            }
        }

        log::debug!("Parsed animation with {} frames", frames.len());
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pose of `part` in frame `frame`
    pub fn pose(&self, part: &str, frame: usize) -> Option<&PartPose> {
        self.frames.get(frame)?.pose(part)
    }

    /// Append a frame at the end
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Densify the frame sequence by inserting midpoint frames.
    ///
    /// Each pass puts the midpoint of every adjacent pair between the two.
    /// With `join` the last frame is also paired with the first, and their
    /// midpoint is appended. One pass turns N frames into 2N - 1, or 2N when
    /// joined.
    pub fn interpolate(&mut self, passes: usize, join: bool) {
        if self.frames.is_empty() {
            return;
        }

        let original = self.frames.len();
        for _ in 0..passes {
            let mut frames = Vec::with_capacity(self.frames.len() * 2);
            for pair in self.frames.windows(2) {
                frames.push(pair[0].clone());
                frames.push(pair[0].midpoint(&pair[1]));
            }
            if let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) {
                frames.push(last.clone());
                if join {
                    frames.push(last.midpoint(first));
                }
            }
            self.frames = frames;
        }

        log::debug!(
            "Interpolated animation from {} to {} frames ({} passes, join: {})",
            original,
            self.frames.len(),
            passes,
            join
        );
    }
}

fn parse_transform<'t>(line_no: usize, tokens: &'t [String]) -> Result<(&'t str, PartPose)> {
    if tokens.len() != TRANSFORM_FIELDS + 1 {
        return Err(AnmError::parse(
            line_no,
            format!(
                "expected {} fields after 't', found {}",
                TRANSFORM_FIELDS,
                tokens.len() - 1
            ),
        ));
    }
    let translation = parse_triple(tokens, 2).map_err(|m| AnmError::parse(line_no, m))?;
    let rotation = parse_triple(tokens, 5).map_err(|m| AnmError::parse(line_no, m))?;
    Ok((
        tokens[1].as_str(),
        PartPose::new(Vec3::from_array(translation), Vec3::from_array(rotation)),
    ))
}
