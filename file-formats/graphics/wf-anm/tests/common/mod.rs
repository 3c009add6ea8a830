//! Shared fixtures for writing models and animations to a temporary directory

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wf_obj::{DrawCall, GroupBuffers, GroupKey, RenderBackend};

/// Two parts: a unit square body and an arm beside it
pub const PUPPET_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0 0
v 4 0 0
v 4 2 0
g body
f 1 2 3 4
g arm
f 5 6 7
";

/// Swing the arm a quarter turn and back
pub const SWING_ANM: &str = "\
# swing
f
t arm 0 0 0 0 0 0
f
t arm 0 0 0 0 0 90
";

/// Bob the whole puppet up and down
pub const BOB_ANM: &str = "\
f
t body 0 0 0 0 0 0
t arm 0 0 0 0 0 0
f
t body 0 1 0 0 0 0
t arm 0 1 0 0 0 0
";

/// Write `files` into a fresh temporary directory
pub fn write_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths = files
        .iter()
        .map(|(name, contents)| {
            let path = dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

/// Records draw calls for later inspection
#[derive(Default)]
pub struct RecordingBackend {
    pub uploaded: Vec<GroupKey>,
    pub draws: Vec<DrawRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub key: GroupKey,
    pub vertex_count: usize,
    pub transform: glam::Mat4,
}

impl RenderBackend for RecordingBackend {
    fn upload(&mut self, key: GroupKey, _buffers: &GroupBuffers) {
        self.uploaded.push(key);
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.draws.push(DrawRecord {
            key: call.key,
            vertex_count: call.vertex_count,
            transform: call.transform,
        });
    }
}
