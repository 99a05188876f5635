// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective warp engine — maps a source quadrilateral to an axis-aligned
// rectangle sized to its true aspect ratio, plus the axis-aligned crop
// fallback used when projective correction is unavailable or impossible.

use belegwerk_core::geometry::{Quad, distance, fit_within_bound};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument, warn};

use crate::raster::Raster;

/// Out-of-bounds samples take this colour (paper white).
const BORDER_PIXEL: Rgba<u8> = Rgba([255u8, 255, 255, 255]);

/// Output rectangle dimensions for a quadrilateral, before bounding.
///
/// Width is the larger of the two horizontal edge lengths and height the
/// larger of the two vertical ones. Taking the maximum, rather than the
/// average, tolerates slight skew in the photographed rectangle instead of
/// distorting toward the skewed mean.
fn rectified_dimensions(quad: &Quad) -> (u32, u32) {
    let width_top = distance(quad.top_right(), quad.top_left());
    let width_bottom = distance(quad.bottom_right(), quad.bottom_left());
    let height_left = distance(quad.top_left(), quad.bottom_left());
    let height_right = distance(quad.top_right(), quad.bottom_right());

    let out_w = width_top.max(width_bottom).round() as u32;
    let out_h = height_left.max(height_right).round() as u32;
    (out_w.max(1), out_h.max(1))
}

/// Rectify `quad` out of `image` with a full projective transform.
///
/// The output is sized to the quadrilateral's true aspect ratio (see
/// [`rectified_dimensions`]) and bounded by `max_long_side`. Resampling is
/// bicubic. Degenerate quadrilaterals have no projective solution and fall
/// through to [`axis_aligned_crop`], so this function always produces an
/// image of at least 1x1.
#[instrument(skip(image, quad), fields(max_long_side))]
pub fn warp_projective(image: &DynamicImage, quad: &Quad, max_long_side: u32) -> DynamicImage {
    let (raw_w, raw_h) = rectified_dimensions(quad);
    let fit = fit_within_bound(raw_w, raw_h, max_long_side);
    let (out_w, out_h) = (fit.width, fit.height);

    if quad.is_degenerate() {
        warn!("degenerate quadrilateral; falling back to axis-aligned crop");
        return axis_aligned_crop(image, quad, max_long_side);
    }

    let src: [(f32, f32); 4] = [
        (quad.top_left().x, quad.top_left().y),
        (quad.top_right().x, quad.top_right().y),
        (quad.bottom_right().x, quad.bottom_right().y),
        (quad.bottom_left().x, quad.bottom_left().y),
    ];
    let dst: [(f32, f32); 4] = [
        (0.0, 0.0),
        (out_w as f32, 0.0),
        (out_w as f32, out_h as f32),
        (0.0, out_h as f32),
    ];

    // from_control_points computes the mapping from `src` to `dst`.
    let projection = match Projection::from_control_points(src, dst) {
        Some(p) => p,
        None => {
            warn!("no projective solution for quadrilateral; falling back to axis-aligned crop");
            return axis_aligned_crop(image, quad, max_long_side);
        }
    };

    let rgba = image.to_rgba8();
    let mut output = RgbaImage::new(out_w, out_h);
    warp_into(&rgba, &projection, Interpolation::Bicubic, BORDER_PIXEL, &mut output);

    debug!(out_w, out_h, "Projective warp applied");
    DynamicImage::ImageRgba8(output)
}

/// Crop-and-scale fallback: the clamped bounding box of the quadrilateral,
/// scaled to fit `max_long_side`.
///
/// No perspective correction happens here — skew stays in the output — but
/// the operation cannot fail, even for a quadrilateral collapsed to a point
/// or lying partly outside the raster. Output is always at least 1x1.
#[instrument(skip(image, quad), fields(max_long_side))]
pub fn axis_aligned_crop(image: &DynamicImage, quad: &Quad, max_long_side: u32) -> DynamicImage {
    let (img_w, img_h) = (image.width() as f32, image.height() as f32);
    let (min_x, min_y, max_x, max_y) = quad.bounding_box();

    let x0 = min_x.max(0.0);
    let y0 = min_y.max(0.0);
    let x1 = max_x.min(img_w);
    let y1 = max_y.min(img_h);

    let crop_w = ((x1 - x0).round()).max(1.0) as u32;
    let crop_h = ((y1 - y0).round()).max(1.0) as u32;

    debug!(x0, y0, crop_w, crop_h, "Axis-aligned crop");
    Raster::from_dynamic(image.clone())
        .crop(x0 as u32, y0 as u32, crop_w, crop_h)
        .fit_to(max_long_side)
        .into_dynamic()
}

// -- Tests --------------------------------------------------------------------
