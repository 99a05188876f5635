// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster pipeline — decode, display-fit resize, rotate, crop, and JPEG
// encoding for receipt images. Operates on in-memory images using the
// `image` crate.

use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_core::geometry::{FitSize, fit_within_bound};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

/// An in-memory working image.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `Raster` wrapping the transformed image, enabling method
/// chaining.
///
/// ```ignore
/// let jpeg = Raster::from_bytes(&photo)?
///     .fit_to(2000)
///     .rotate90()
///     .to_jpeg_bytes(90)?;
/// ```
#[derive(Debug)]
pub struct Raster {
    /// The current working image.
    image: DynamicImage,
}

impl Raster {
    // -- Construction ---------------------------------------------------------

    /// Decode a raster from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| BelegwerkError::Decode(format!("failed to decode image: {err}")))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Raster decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Load a raster from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            BelegwerkError::Decode(format!(
                "failed to open image {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the raster and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) ----------------------

    /// Scale down so the longer side fits `max_long_side`, preserving aspect
    /// ratio. Never upscales. Uses Lanczos3 filtering for quality.
    #[instrument(skip(self), fields(max_long_side))]
    pub fn fit_to(self, max_long_side: u32) -> Self {
        let FitSize { width, height, scale } =
            fit_within_bound(self.image.width(), self.image.height(), max_long_side);
        if scale >= 1.0 {
            return self;
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Fitting raster to display bound"
        );
        let resized = self
            .image
            .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Rotate 90° clockwise, swapping width and height.
    #[instrument(skip(self))]
    pub fn rotate90(self) -> Self {
        Self {
            image: self.image.rotate90(),
        }
    }

    /// Crop a rectangular region. Values are clamped to image bounds and the
    /// crop size floored at one pixel.
    #[instrument(skip(self), fields(x, y, width, height))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.clamp(1, img_w - safe_x);
        let safe_h = height.clamp(1, img_h - safe_y);

        debug!(safe_x, safe_y, safe_w, safe_h, "Cropping raster");
        let cropped = self.image.crop_imm(safe_x, safe_y, safe_w, safe_h);
        Self { image: cropped }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| BelegwerkError::Encode(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| BelegwerkError::Encode(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            BelegwerkError::Encode(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    fn gray(width: u32, height: u32) -> Raster {
        Raster::from_dynamic(DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            width,
            height,
            Luma([127u8]),
        )))
    }

    /// Garbage bytes fail with a decode error, not a panic.
    #[test]
    fn from_bytes_rejects_garbage() {
        let err = Raster::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BelegwerkError::Decode(_)));
    }

    /// A JPEG round trip decodes back to the same dimensions.
    #[test]
    fn jpeg_round_trip_preserves_dimensions() {
        let jpeg = gray(320, 200).to_jpeg_bytes(90).unwrap();
        let back = Raster::from_bytes(&jpeg).unwrap();
        assert_eq!((back.width(), back.height()), (320, 200));
    }

    /// `fit_to` downscales oversized images and leaves small ones untouched.
    #[test]
    fn fit_to_downscales_only() {
        let big = gray(4000, 2000).fit_to(2000);
        assert_eq!((big.width(), big.height()), (2000, 1000));

        let small = gray(800, 600).fit_to(2000);
        assert_eq!((small.width(), small.height()), (800, 600));
    }

    /// Rotation swaps dimensions and moves pixels to the expected place.
    #[test]
    fn rotate90_swaps_dimensions() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0u8, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let rotated = Raster::from_dynamic(DynamicImage::ImageRgba8(img)).rotate90();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        // Top-left travels to the top-right corner under a clockwise turn.
        let out = rotated.into_dynamic().to_rgba8();
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
    }

    /// Crops are clamped to image bounds and never collapse below 1x1.
    #[test]
    fn crop_clamps_to_bounds() {
        let cropped = gray(100, 80).crop(90, 70, 50, 50);
        assert_eq!((cropped.width(), cropped.height()), (10, 10));

        let floor = gray(100, 80).crop(20, 20, 0, 0);
        assert_eq!((floor.width(), floor.height()), (1, 1));
    }

    /// `save` writes a readable file to disk.
    #[test]
    fn save_writes_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        gray(64, 48).save(&path).unwrap();
        let back = Raster::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (64, 48));
    }
}
