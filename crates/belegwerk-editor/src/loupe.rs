// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loupe geometry — the magnified circular preview drawn beside a dragged
// corner handle so the user can place it precisely.

use belegwerk_core::geometry::Point;

/// Loupe radius in image pixels.
const LOUPE_RADIUS: f32 = 36.0;
/// Magnification factor inside the loupe.
const LOUPE_SCALE: f32 = 2.0;
/// Gap between the dragged point and the loupe circle.
const LOUPE_OFFSET: f32 = 10.0;

/// A rectangular region of the base raster, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The magnified preview beside a dragged handle.
///
/// Surfaces draw the `source` region of the base raster, scaled by
/// `magnification`, clipped to a circle of `radius` at `center`. The circle
/// sits above and to the right of the handle so the finger never covers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loupe {
    /// Centre of the loupe circle, in image space on the overlay.
    pub center: Point,
    pub radius: f32,
    pub magnification: f32,
    /// The raster region to magnify, centred on the (clamped) handle.
    pub source: SourceRect,
}

impl Loupe {
    /// Build the loupe for a handle at `point` on a `width x height` raster.
    pub fn around(point: Point, width: f32, height: f32) -> Self {
        // Sample around a bounds-clamped copy of the point so the preview
        // stays meaningful while the handle rides an edge.
        let sx = point.x.clamp(0.0, (width - 1.0).max(0.0));
        let sy = point.y.clamp(0.0, (height - 1.0).max(0.0));
        let span = (2.0 * LOUPE_RADIUS) / LOUPE_SCALE;

        Self {
            center: Point::new(
                point.x + LOUPE_RADIUS + LOUPE_OFFSET,
                point.y - LOUPE_RADIUS - LOUPE_OFFSET,
            ),
            radius: LOUPE_RADIUS,
            magnification: LOUPE_SCALE,
            source: SourceRect {
                x: sx - LOUPE_RADIUS / LOUPE_SCALE,
                y: sy - LOUPE_RADIUS / LOUPE_SCALE,
                width: span,
                height: span,
            },
        }
    }
}
