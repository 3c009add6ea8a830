//! Texture resources referenced by `map_Kd`
//!
//! Decoding is delegated to a [`TextureLoader`]. The default
//! [`ImageTextureLoader`] reads PNG files through the `image` crate. Binding a
//! texture against a graphics context is left to the render backend, which
//! receives the [`Texture`] alongside every draw call.

use crate::error::{ObjError, Result};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

/// Handle of a texture inside a [`MaterialLibrary`](crate::MaterialLibrary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureId(pub usize);

/// Pixel layout of a decoded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 8-bit red, green, blue
    Rgb,
    /// 8-bit red, green, blue, alpha
    Rgba,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// A decoded image ready for upload by the render backend
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    /// File the texture was decoded from
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Row-major pixel data, `width * height * channels` bytes
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        self.format.channels()
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("pixels", &format_args!("[{} bytes]", self.pixels.len()))
            .finish()
    }
}

/// Source of decoded textures
pub trait TextureLoader {
    /// Decode the image at `path`
    fn load(&self, path: &Path) -> Result<Texture>;
}

/// PNG signature every accepted texture starts with
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Default loader decoding PNG files with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTextureLoader;

impl ImageTextureLoader {
    /// Decode PNG bytes that were read from `path`
    pub fn decode(path: &Path, data: &[u8]) -> Result<Texture> {
        if !data.starts_with(&PNG_SIGNATURE) {
            return Err(ObjError::Texture {
                path: path.to_owned(),
                message: "not a recognised PNG file".to_string(),
            });
        }

        let image = image::load_from_memory_with_format(data, ImageFormat::Png).map_err(|e| {
            ObjError::Texture {
                path: path.to_owned(),
                message: e.to_string(),
            }
        })?;

        let width = image.width();
        let height = image.height();
        let (format, pixels) = match image {
            DynamicImage::ImageRgb8(buffer) => (PixelFormat::Rgb, buffer.into_raw()),
            DynamicImage::ImageRgba8(buffer) => (PixelFormat::Rgba, buffer.into_raw()),
            other => {
                return Err(ObjError::UnsupportedColorType {
                    path: path.to_owned(),
                    color_type: format!("{:?}", other.color()),
                });
            }
        };

        log::debug!(
            "Decoded texture {} ({}x{}, {:?})",
            path.display(),
            width,
            height,
            format
        );

        Ok(Texture {
            path: path.to_owned(),
            width,
            height,
            format,
            pixels,
        })
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load(&self, path: &Path) -> Result<Texture> {
        let data = std::fs::read(path).map_err(|e| ObjError::FileSystem(path.to_owned(), e))?;
        Self::decode(path, &data)
    }
}
