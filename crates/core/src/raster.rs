//! Rasterization of the rendered result pane.
//!
//! Export actions work on a screenshot of the whole viewport; this module
//! handles converting egui's raster into an [`image::DynamicImage`] and
//! cropping it down to the result pane.
//!
//! # Coordinate Mapping
//!
//! The UI lays widgets out in logical points while the screenshot arrives in
//! physical pixels; on HiDPI displays the two differ by `pixels_per_point`.
//! Crop rectangles are scaled and clamped accordingly.

use crate::error::{AppError, Result};
use eframe::egui;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Converts an egui screenshot into an owned RGBA image.
pub fn frame_to_image(frame: &egui::ColorImage) -> Result<DynamicImage> {
    let [width, height] = frame.size;
    let bytes: Vec<u8> = frame
        .pixels
        .iter()
        .flat_map(|color| color.to_array())
        .collect();

    let buffer = image::ImageBuffer::from_raw(width as u32, height as u32, bytes)
        .ok_or_else(|| AppError::raster("Screenshot buffer has inconsistent dimensions"))?;

    Ok(DynamicImage::ImageRgba8(buffer))
}

/// Crops a viewport raster down to a region given in UI points.
///
/// # Arguments
///
/// * `frame` - The full viewport screenshot
/// * `region` - The result pane rectangle in UI points
/// * `pixels_per_point` - The scale factor the frame was captured at
///
/// # Errors
///
/// Returns [`AppError::EmptyRegion`] if the region has zero area after
/// clamping to the frame bounds.
pub fn crop_region(
    frame: &DynamicImage,
    region: egui::Rect,
    pixels_per_point: f32,
) -> Result<DynamicImage> {
    let x = (region.min.x * pixels_per_point).max(0.0) as u32;
    let y = (region.min.y * pixels_per_point).max(0.0) as u32;

    let mut width = (region.width() * pixels_per_point) as u32;
    let mut height = (region.height() * pixels_per_point) as u32;

    // Clamp to frame bounds to prevent out-of-bounds errors
    if x + width > frame.width() {
        width = frame.width().saturating_sub(x);
    }
    if y + height > frame.height() {
        height = frame.height().saturating_sub(y);
    }

    if width == 0 || height == 0 {
        return Err(AppError::EmptyRegion);
    }

    Ok(frame.crop_imm(x, y, width, height))
}

/// Encodes an image as PNG bytes for download or sharing.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| AppError::raster(format!("Failed to encode PNG: {}", e)))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn frame(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([1, 2, 3, 255]),
        ))
    }

    #[test]
    fn crop_scales_by_pixels_per_point() {
        let frame = frame(200, 100);
        let region = egui::Rect::from_min_size(egui::pos2(10.0, 5.0), egui::vec2(40.0, 20.0));

        let cropped = crop_region(&frame, region, 2.0).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (80, 40));
    }

    #[test]
    fn crop_clamps_to_frame_bounds() {
        let frame = frame(100, 100);
        let region = egui::Rect::from_min_size(egui::pos2(80.0, 80.0), egui::vec2(50.0, 50.0));

        let cropped = crop_region(&frame, region, 1.0).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (20, 20));
    }

    #[test]
    fn zero_area_region_is_rejected() {
        let frame = frame(100, 100);
        let region = egui::Rect::from_min_size(egui::pos2(150.0, 150.0), egui::vec2(10.0, 10.0));
        assert!(matches!(
            crop_region(&frame, region, 1.0),
            Err(AppError::EmptyRegion)
        ));

        let empty = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(0.0, 0.0));
        assert!(matches!(
            crop_region(&frame, empty, 1.0),
            Err(AppError::EmptyRegion)
        ));
    }

    #[test]
    fn screenshot_converts_to_rgba() {
        let red = [255u8, 0, 0, 255].repeat(8);
        let color_image = egui::ColorImage::from_rgba_unmultiplied([4, 2], &red);
        let image = frame_to_image(&color_image).unwrap();
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(image.to_rgba8().get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn png_bytes_carry_magic_header() {
        let bytes = encode_png(&frame(3, 3)).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }
}
