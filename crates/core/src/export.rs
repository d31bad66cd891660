//! Export actions: saving the rendered meme to disk and sharing it.
//!
//! Sharing uses the system clipboard as the native share surface. Its
//! availability is probed up front so the UI can disable the action instead
//! of failing silently.

use crate::error::{AppError, Result};
use crate::raster::encode_png;
use image::DynamicImage;
use std::borrow::Cow;
use std::path::Path;

/// Whether the platform share capability (clipboard) can be reached.
pub fn share_available() -> bool {
    arboard::Clipboard::new().is_ok()
}

/// Places the meme image on the system clipboard.
///
/// # Errors
///
/// Returns [`AppError::ShareUnavailable`] when no clipboard is reachable and
/// [`AppError::Rasterization`] when handing the image over fails.
pub fn share_image(image: &DynamicImage) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|_| AppError::ShareUnavailable)?;

    let rgba = image.to_rgba8();
    let data = arboard::ImageData {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    };

    clipboard
        .set_image(data)
        .map_err(|e| AppError::raster(format!("Failed to share image: {}", e)))?;
    Ok(())
}

/// Writes the meme as a PNG file, with no partial file left on failure.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn write_png_produces_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ai-meme-abc123.png");
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            6,
            4,
            image::Rgba([9, 9, 9, 255]),
        ));

        write_png(&image, &path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (6, 4));
    }
}
