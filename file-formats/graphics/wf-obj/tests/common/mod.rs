//! Shared fixtures for writing models to a temporary directory

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A textured two-part model with two materials
pub const ROBOT_OBJ: &str = "\
# robot
mtllib robot.mtl
v -1 0 0
v 1 0 0
v 1 2 0
v -1 2 0
v 3 0 0
v 5 0 0
v 5 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1

o body
usemtl skin
f 1/1 2/2 3/3 4/4

g arm
usemtl steel
f 5 6 7
usemtl skin
f 5/1 6/2 7/3
usemtl steel
f 7 6 5
";

pub const ROBOT_MTL: &str = "\
newmtl skin
Kd 0.8 0.6 0.4
map_Kd skin.png

newmtl steel
Ka 0.1 0.1 0.1
Kd 0.5 0.5 0.5
Ks 1 1 1
d 1
";

/// Write `files` into a fresh temporary directory
pub fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

/// Write an RGB PNG of the given size filled with one color
pub fn write_rgb_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)));
    image.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Write an 8-bit grayscale PNG
pub fn write_gray_png(path: &Path) {
    let image = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(2, 2, Luma([100u8])));
    image.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Directory holding the robot model, its library and texture
pub fn robot_dir() -> (TempDir, PathBuf) {
    let dir = write_files(&[("robot.obj", ROBOT_OBJ), ("robot.mtl", ROBOT_MTL)]);
    write_rgb_png(&dir.path().join("skin.png"), 4, 2, [200, 150, 100]);
    let model_path = dir.path().join("robot.obj");
    (dir, model_path)
}
