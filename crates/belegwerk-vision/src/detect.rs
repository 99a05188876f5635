// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour-based quadrilateral detection for photographed documents.
//
// The detector is a noisy heuristic: it is expected to fail on low-contrast
// backgrounds, and the interactive edit surface exists precisely so a human
// can correct it. Failure is therefore always soft (`None`), never an error.

use belegwerk_core::geometry::{Point, Quad, shoelace_area};
use image::DynamicImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use tracing::{debug, instrument};

/// Gaussian sigma matching a 5x5 smoothing kernel.
const BLUR_SIGMA: f32 = 1.1;
/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
/// Polygon approximation tolerance as a fraction of the contour perimeter.
const APPROX_EPSILON: f64 = 0.02;

/// Find the most plausible document quadrilateral in `image`.
///
/// ## Pipeline
///
/// 1. Convert to grayscale
/// 2. Gaussian blur for noise suppression
/// 3. Canny edge detection
/// 4. Extract external contours and approximate each to a polygon at 2% of
///    its perimeter
/// 5. Among the 4-vertex approximations, keep the one with the largest
///    enclosed area (first found wins ties, since a candidate must strictly
///    beat the running maximum)
/// 6. Sort the winning corners into canonical TL, TR, BR, BL order
///
/// Returns `None` when no 4-vertex contour exists.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn detect_document_quad(image: &DynamicImage) -> Option<Quad> {
    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);

    let contours = find_contours::<i32>(&edges);
    debug!(contour_count = contours.len(), "Contours extracted");

    let mut best: Option<[Point; 4]> = None;
    let mut best_area = 0.0f32;

    for contour in contours.iter().filter(|c| c.border_type == BorderType::Outer) {
        if contour.points.len() < 4 {
            continue;
        }
        let perimeter = arc_length(&contour.points, true);
        let approx = approximate_polygon_dp(&contour.points, APPROX_EPSILON * perimeter, true);
        if approx.len() != 4 {
            continue;
        }
        let corners = [
            Point::new(approx[0].x as f32, approx[0].y as f32),
            Point::new(approx[1].x as f32, approx[1].y as f32),
            Point::new(approx[2].x as f32, approx[2].y as f32),
            Point::new(approx[3].x as f32, approx[3].y as f32),
        ];
        let area = shoelace_area(&corners);
        if area > best_area {
            best_area = area;
            best = Some(corners);
        }
    }

    debug!(best_area, found = best.is_some(), "Quadrilateral search complete");
    best.map(Quad::from_unordered)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn white_rectangle_on_black(
        (img_w, img_h): (u32, u32),
        (x0, y0): (u32, u32),
        (x1, y1): (u32, u32),
    ) -> DynamicImage {
        let mut img = GrayImage::from_pixel(img_w, img_h, Luma([10u8]));
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([245u8]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    /// A clear white rectangle on a black background is found with a bounding
    /// box area within 5% of the rectangle's true area.
    #[test]
    fn detects_synthetic_rectangle() {
        let image = white_rectangle_on_black((400, 500), (50, 60), (350, 440));
        let quad = detect_document_quad(&image).expect("rectangle should be detected");

        let (min_x, min_y, max_x, max_y) = quad.bounding_box();
        let detected_area = (max_x - min_x) * (max_y - min_y);
        let true_area = (350.0 - 50.0) * (440.0 - 60.0);
        let ratio = detected_area / true_area;
        assert!(
            (0.95..=1.05).contains(&ratio),
            "detected area off by more than 5%: ratio {ratio}"
        );
    }

    /// Detected corners come back in canonical order.
    #[test]
    fn detected_corners_are_canonical() {
        let image = white_rectangle_on_black((300, 300), (40, 50), (260, 250));
        let quad = detect_document_quad(&image).expect("rectangle should be detected");
        assert!(quad.top_left().x <= quad.top_right().x);
        assert!(quad.top_left().y <= quad.bottom_left().y);
        assert!(quad.bottom_left().x <= quad.bottom_right().x);
        assert!(quad.top_right().y <= quad.bottom_right().y);
    }

    /// A featureless image yields no quadrilateral rather than an error.
    #[test]
    fn blank_image_yields_none() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 150, Luma([128u8])));
        assert!(detect_document_quad(&image).is_none());
    }

    /// A tiny image cannot panic the pipeline.
    #[test]
    fn tiny_image_does_not_panic() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([200u8])));
        let _ = detect_document_quad(&image);
    }
}
