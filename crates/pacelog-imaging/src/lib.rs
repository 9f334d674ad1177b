// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic image normalization for OCR.
//!
//! Race-result photos arrive as arbitrary camera shots; OCR accuracy on them
//! improves markedly after downscaling, grayscale conversion, contrast
//! stretching, and binarization. The transform here is pure: the caller keeps
//! the original bytes for storage and display, and only the normalized copy
//! goes to the OCR service.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, imageops::FilterType};
use tracing::debug;

use pacelog_core::PacelogError;

/// Tuning for [`normalize_for_ocr`].
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    /// Maximum output width. Images narrower than this are left at their
    /// original size — upscaling only blurs text.
    pub max_width: u32,
    /// Grayscale cutoff for binarization: luma >= threshold becomes white,
    /// everything else black.
    pub threshold: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1000,
            threshold: 160,
        }
    }
}

/// Normalize raw image bytes for OCR submission.
///
/// Pipeline: decode -> bounded resize (aspect preserved, never enlarges) ->
/// grayscale -> contrast stretch -> fixed-threshold binarization -> PNG.
///
/// Fails with [`PacelogError::Imaging`] when the bytes are not a decodable
/// image; callers treat that as fatal for OCR but still store the original.
pub fn normalize_for_ocr(bytes: &[u8], opts: &NormalizeOptions) -> Result<Vec<u8>, PacelogError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PacelogError::Imaging(format!("failed to decode image: {e}")))?;

    let (orig_w, orig_h) = (decoded.width(), decoded.height());
    let resized = bounded_resize(decoded, opts.max_width);

    let mut gray = resized.to_luma8();
    stretch_contrast(&mut gray);
    binarize(&mut gray, opts.threshold);

    let mut out = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| PacelogError::Imaging(format!("failed to encode normalized image: {e}")))?;

    debug!(
        orig_w,
        orig_h,
        out_bytes = out.len(),
        "image normalized for OCR"
    );
    Ok(out)
}

/// Resize so width <= `max_width`, preserving aspect ratio. Never upscales.
fn bounded_resize(img: DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    if w <= max_width {
        return img;
    }
    let new_h = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
    img.resize_exact(max_width, new_h, FilterType::CatmullRom)
}

/// Min/max contrast stretch: maps the darkest pixel to 0 and the brightest
/// to 255. A flat image (min == max) is left untouched.
fn stretch_contrast(img: &mut GrayImage) {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    for p in img.pixels() {
        min = min.min(p.0[0]);
        max = max.max(p.0[0]);
    }
    if min >= max {
        return;
    }
    let range = (max - min) as u16;
    for p in img.pixels_mut() {
        let v = (p.0[0] - min) as u16;
        p.0[0] = ((v * 255) / range) as u8;
    }
}

/// Fixed-cutoff binarization.
fn binarize(img: &mut GrayImage, threshold: u8) {
    for p in img.pixels_mut() {
        p.0[0] = if p.0[0] >= threshold { 255 } else { 0 };
    }
}
