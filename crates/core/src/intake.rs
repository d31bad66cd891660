//! Image intake: turning a user-selected file into a request reference.
//!
//! The intake owns the currently loaded image. Loading a new file replaces
//! the previous image and its derived reference before the new ones are
//! stored, so repeated uploads never accumulate stale buffers.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Advisory upload limit, matching the "PNG, JPG up to 10MB" hint.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Holds the currently selected image and its service-facing reference.
#[derive(Default)]
pub struct ImageIntake {
    image: Option<DynamicImage>,
    reference: Option<String>,
    file_name: Option<String>,
}

impl ImageIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an image file, replacing any previously loaded one.
    ///
    /// On any failure the previous image is left untouched, so a bad pick
    /// never destroys a working selection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if the file exceeds the upload
    /// limit or cannot be decoded as an image.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(AppError::image(format!(
                "{} is {:.1} MB, above the 10 MB upload limit",
                path.display(),
                size as f64 / (1024.0 * 1024.0)
            )));
        }

        let image = image::open(path)
            .map_err(|e| AppError::image(format!("Failed to decode {}: {}", path.display(), e)))?;
        let reference = encode_reference(&image)?;

        // Drop the previous image and reference before storing the new ones.
        self.clear();
        self.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.image = Some(image);
        self.reference = Some(reference);
        Ok(())
    }

    /// Releases the current image and its reference.
    pub fn clear(&mut self) {
        self.image = None;
        self.reference = None;
        self.file_name = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// The service-facing reference for the current image, if any.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

/// Encodes an image as a base64 JPEG data URL.
///
/// This is the native stand-in for a browser object URL: a self-contained
/// string the service can dereference without access to the local filesystem.
fn encode_reference(image: &DynamicImage) -> Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    // JPEG has no alpha channel; flatten first so encoding cannot fail on
    // RGBA sources like screenshots or transparent PNGs.
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_to(&mut cursor, ImageFormat::Jpeg)
        .map_err(|e| AppError::image(format!("Failed to encode image: {}", e)))?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(buffer)))
}
