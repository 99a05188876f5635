// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry primitives for the receipt pipeline — points, quadrilaterals,
// fit-to-bounds scaling, and the pan/zoom view transform.
//
// Two coordinate spaces exist side by side: image space (pixels of the
// working raster, used for the quadrilateral and all hit-testing) and screen
// space (pointer positions as reported by the host surface). `ViewTransform`
// is the bridge between them.

use serde::{Deserialize, Serialize};

/// A point in image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in screen space, as delivered by the host's pointer events.
///
/// Never feed one of these to the quadrilateral directly — convert through
/// [`ViewTransform::screen_to_image`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two image-space points.
pub fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Euclidean distance between two screen-space points (pinch spread).
pub fn screen_distance(a: ScreenPoint, b: ScreenPoint) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Area of a polygon given by vertices in traversal order (shoelace formula).
pub fn shoelace_area(points: &[Point]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area.abs() / 2.0
}

// -- Quadrilateral -------------------------------------------------------------

/// Four corner points delimiting a document's region within a raster.
///
/// Corners are always stored in canonical order: top-left, top-right,
/// bottom-right, bottom-left. Construct via [`Quad::new`] when the order is
/// already known, or [`Quad::from_unordered`] to sort arbitrary corners into
/// canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    corners: [Point; 4],
}

/// Cross products below this magnitude count as collinear (squared pixels).
const COLLINEAR_EPSILON: f32 = 1e-3;

impl Quad {
    /// Build from corners already in TL, TR, BR, BL order.
    pub fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self {
            corners: [tl, tr, br, bl],
        }
    }

    /// Sort four arbitrary corners into canonical TL, TR, BR, BL order.
    ///
    /// Sort by y to split a top pair from a bottom pair, then sort each pair
    /// by x. Detector output and user-authored corners arrive unordered, so
    /// every external source of corners goes through here.
    pub fn from_unordered(mut points: [Point; 4]) -> Self {
        points.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });
        let (mut top, mut bottom) = ([points[0], points[1]], [points[2], points[3]]);
        if top[0].x > top[1].x {
            top.swap(0, 1);
        }
        if bottom[0].x > bottom[1].x {
            bottom.swap(0, 1);
        }
        Self {
            corners: [top[0], top[1], bottom[1], bottom[0]],
        }
    }

    /// Default corner seed: a box inset 10% from each raster edge.
    pub fn inset_box(width: f32, height: f32) -> Self {
        Self::new(
            Point::new(width * 0.1, height * 0.1),
            Point::new(width * 0.9, height * 0.1),
            Point::new(width * 0.9, height * 0.9),
            Point::new(width * 0.1, height * 0.9),
        )
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn corner(&self, index: usize) -> Point {
        self.corners[index]
    }

    /// Move one corner. `index` follows the canonical TL, TR, BR, BL order.
    pub fn set_corner(&mut self, index: usize, point: Point) {
        self.corners[index] = point;
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f32 {
        shoelace_area(&self.corners)
    }

    /// True when any three corners are (near-)collinear.
    ///
    /// A degenerate quadrilateral has no projective mapping to a rectangle;
    /// callers must route it to the axis-aligned crop engine instead.
    pub fn is_degenerate(&self) -> bool {
        for i in 0..4 {
            for j in (i + 1)..4 {
                for k in (j + 1)..4 {
                    let (a, b, c) = (self.corners[i], self.corners[j], self.corners[k]);
                    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
                    if cross.abs() < COLLINEAR_EPSILON {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Remap corners for a 90° clockwise raster rotation: `(x, y) -> (h - y, x)`
    /// where `h` is the raster height *before* the rotation.
    ///
    /// The remapped corners keep their canonical order (the old bottom-left
    /// becomes the new top-left, and so on around the quad).
    pub fn rotate_cw(&self, old_height: f32) -> Self {
        let rot = |p: Point| Point::new(old_height - p.y, p.x);
        // TL' = BL, TR' = TL, BR' = TR, BL' = BR
        Self {
            corners: [
                rot(self.corners[3]),
                rot(self.corners[0]),
                rot(self.corners[1]),
                rot(self.corners[2]),
            ],
        }
    }

    /// Clamp every corner into `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> Self {
        let clamp = |p: Point| Point::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height));
        Self {
            corners: [
                clamp(self.corners[0]),
                clamp(self.corners[1]),
                clamp(self.corners[2]),
                clamp(self.corners[3]),
            ],
        }
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> (f32, f32, f32, f32) {
        let xs = self.corners.map(|p| p.x);
        let ys = self.corners.map(|p| p.y);
        let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (min_x, min_y, max_x, max_y)
    }
}

// -- Fit-to-bounds scaling -----------------------------------------------------

/// Result of [`fit_within_bound`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSize {
    pub width: u32,
    pub height: u32,
    /// The uniform scale factor applied, `<= 1.0`.
    pub scale: f32,
}

/// Scale `width x height` down so the longer side fits `max_long_side`.
///
/// Never upscales: when the longer side is already within the bound the input
/// dimensions come back unchanged with scale 1. Output dimensions are rounded
/// to the nearest integer and floored at 1.
pub fn fit_within_bound(width: u32, height: u32, max_long_side: u32) -> FitSize {
    let long = width.max(height);
    let scale = if long > max_long_side {
        max_long_side as f32 / long as f32
    } else {
        1.0
    };
    FitSize {
        width: ((width as f32 * scale).round() as u32).max(1),
        height: ((height as f32 * scale).round() as u32).max(1),
        scale,
    }
}

// -- View transform ------------------------------------------------------------

/// Minimum zoom accepted by pinch and wheel gestures.
pub const MIN_ZOOM: f32 = 0.5;
/// Maximum zoom accepted by pinch and wheel gestures.
pub const MAX_ZOOM: f32 = 4.0;

/// The pan/zoom view state of an edit surface.
///
/// Maps image coordinates to screen coordinates as `screen = image * zoom +
/// pan`, where `pan` is in screen pixels. The transform is presentation-only
/// state: it never leaks into the stored quadrilateral, which stays in image
/// space for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        zoom: 1.0,
        pan_x: 0.0,
        pan_y: 0.0,
    };

    /// Convert a stage-space pointer position to image space.
    ///
    /// `stage` must be relative to the surface's *untransformed* origin. Hosts
    /// whose bounding-rectangle queries already reflect the pan translation
    /// (CSS-transformed canvases do) must not subtract the pan a second time —
    /// they should report positions relative to the untransformed origin and
    /// let this function apply the full inverse.
    pub fn screen_to_image(&self, stage: ScreenPoint) -> Point {
        Point::new(
            (stage.x - self.pan_x) / self.zoom,
            (stage.y - self.pan_y) / self.zoom,
        )
    }

    /// Convert an image-space point to stage-space screen coordinates.
    pub fn image_to_screen(&self, image: Point) -> ScreenPoint {
        ScreenPoint::new(
            image.x * self.zoom + self.pan_x,
            image.y * self.zoom + self.pan_y,
        )
    }

    /// Translate the view by a raw screen-space delta.
    ///
    /// Pan offsets live in screen space, so the delta is not divided by zoom.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Change zoom while keeping the image point under `focal` visually
    /// stationary.
    ///
    /// `focal` is in stage space (relative to the untransformed surface
    /// origin). One function serves both the pinch-midpoint and wheel-cursor
    /// paths: `pan' = focal - (focal - pan) * (zoom_new / zoom_old)`. The
    /// requested zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn focal_zoom(&mut self, focal: ScreenPoint, requested_zoom: f32) {
        let new_zoom = requested_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = new_zoom / self.zoom;
        self.pan_x = focal.x - (focal.x - self.pan_x) * ratio;
        self.pan_y = focal.y - (focal.y - self.pan_y) * ratio;
        self.zoom = new_zoom;
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// -- Tests --------------------------------------------------------------------
