use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

/// Failure to turn a texture file into pixels. Callers log this and fall
/// back to flat-color rendering instead of aborting.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("unable to read texture {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode texture {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 pixels ready for GPU upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Reads and decodes an image file (format sniffed from the bytes).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TextureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Single-pixel image used as the bind-group placeholder when a real
    /// texture failed to load.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::io::Write;

    static CHECKER_PNG: Lazy<Vec<u8>> = Lazy::new(|| {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .expect("encode fixture");
        bytes
    });

    #[test]
    fn decodes_a_png_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("temp texture");
        file.write_all(&CHECKER_PNG).expect("write fixture");
        let image = TextureImage::from_file(file.path()).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.byte_len(), 2 * 2 * 4);
        assert_eq!(&image.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = TextureImage::from_file("does/not/exist.jpg").unwrap_err();
        assert!(matches!(err, TextureError::Read { .. }));
        assert!(err.to_string().contains("does/not/exist.jpg"));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"definitely not an image").expect("write");
        let err = TextureImage::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn solid_fallback_is_one_pixel() {
        let image = TextureImage::solid([10, 20, 30, 255]);
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.pixels, vec![10, 20, 30, 255]);
    }
}
