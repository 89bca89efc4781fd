// SPDX-License-Identifier: MPL-2.0
//! Image loading and decoding for the gallery widgets.
//!
//! Two access paths exist: a cheap dimension *probe* used by the sizing
//! engine (header decode only, no pixel data) and a full decode into an
//! Iced image handle for display. Both run on blocking worker threads so
//! the update loop never waits on the filesystem.

pub mod prefetch;

use crate::error::{Error, Result};
use iced::widget::image;
use image_rs::GenericImageView;
use std::fs;
use std::path::{Path, PathBuf};

/// Natural (intrinsic) dimensions of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let handle = image::Handle::from_rgba(width, height, pixels);
        Self {
            handle,
            width,
            height,
        }
    }

    /// Approximate memory footprint (RGBA) used for cache accounting.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Load an image from the given path and decode it for display.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Image`]
/// when the data does not decode. The caller renders the slide's
/// broken-image fallback state; navigation to other slides is unaffected.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let img_bytes = fs::read(path.as_ref()).map_err(|e| Error::Io(e.to_string()))?;
    let img = image_rs::load_from_memory(&img_bytes)?;

    let (width, height) = img.dimensions();
    let pixels = img.to_rgba8().into_vec();

    Ok(ImageData::from_rgba(width, height, pixels))
}

/// Probe an image's natural dimensions without decoding pixel data.
///
/// A probe that fails for any reason contributes no size; it is the sizing
/// engine's accepted inert case, not an error.
#[must_use]
pub fn probe_dimensions<P: AsRef<Path>>(path: P) -> Option<NaturalSize> {
    image_rs::image_dimensions(path.as_ref())
        .ok()
        .map(|(width, height)| NaturalSize { width, height })
}

/// Full decode on a blocking worker, for display or prefetch.
pub async fn load_image_task(path: PathBuf) -> (PathBuf, Result<ImageData>) {
    let path_clone = path.clone();
    let result = tokio::task::spawn_blocking(move || load_image(&path_clone))
        .await
        .unwrap_or_else(|e| Err(Error::Io(format!("Image load task failed: {e}"))));

    (path, result)
}

/// Dimension probe on a blocking worker.
pub async fn probe_dimensions_task(path: PathBuf) -> (PathBuf, Option<NaturalSize>) {
    let path_clone = path.clone();
    let size = tokio::task::spawn_blocking(move || probe_dimensions(&path_clone))
        .await
        .unwrap_or(None);

    (path, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn load_png_image_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("sample.png");

        let image = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        image
            .save(&image_path)
            .expect("failed to write temporary png");

        let data = load_image(&image_path).expect("png should load successfully");
        assert_eq!(data.width, 4);
        assert_eq!(data.height, 2);
        assert_eq!(data.size_bytes(), 4 * 2 * 4);
    }

    #[test]
    fn load_missing_image_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing_path = temp_dir.path().join("does_not_exist.png");

        match load_image(&missing_path) {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_invalid_bytes_returns_image_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let bad_path = temp_dir.path().join("invalid.png");
        fs::write(&bad_path, b"not a png").expect("failed to write invalid data");

        match load_image(&bad_path) {
            Err(Error::Image(message)) => assert!(!message.is_empty()),
            other => panic!("expected Image error for invalid png, got {other:?}"),
        }
    }

    #[test]
    fn probe_reads_dimensions_without_full_decode() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("probe.png");

        let image = RgbaImage::from_pixel(7, 3, Rgba([0, 255, 0, 255]));
        image.save(&image_path).expect("failed to write png");

        assert_eq!(
            probe_dimensions(&image_path),
            Some(NaturalSize {
                width: 7,
                height: 3
            })
        );
    }

    #[test]
    fn failed_probe_contributes_no_size() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        assert_eq!(probe_dimensions(temp_dir.path().join("missing.png")), None);

        let bad_path = temp_dir.path().join("garbage.png");
        fs::write(&bad_path, b"garbage").expect("failed to write garbage");
        assert_eq!(probe_dimensions(&bad_path), None);
    }
}
