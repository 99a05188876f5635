// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drag backend capability — how raw pointer positions become handle
// positions. The built-in pointer backend is always available; an alternate
// backend may be supplied through the lazy loader and silently replaced by
// the built-in one when loading fails.

use belegwerk_core::geometry::Point;

/// Handle hit-test radius in image pixels, after inverse view transform.
const HIT_RADIUS: f32 = 12.0;

/// Interprets handle drags for the edit session.
pub trait DragBackend: Send + Sync {
    /// Hit-test radius around each handle, in image pixels.
    fn hit_radius(&self) -> f32 {
        HIT_RADIUS
    }

    /// Map a raw drag position to the final handle position on a
    /// `width x height` raster.
    fn drag_to(&self, raw: Point, width: f32, height: f32) -> Point;
}

/// The built-in drag backend: clamp the raw position to the raster bounds.
pub struct PointerDrag;

impl DragBackend for PointerDrag {
    fn drag_to(&self, raw: Point, width: f32, height: f32) -> Point {
        Point::new(raw.x.clamp(0.0, width), raw.y.clamp(0.0, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drag positions are clamped to the raster, corners included.
    #[test]
    fn pointer_drag_clamps_to_raster() {
        let p = PointerDrag.drag_to(Point::new(-5.0, 120.0), 100.0, 100.0);
        assert_eq!(p, Point::new(0.0, 100.0));

        let inside = PointerDrag.drag_to(Point::new(40.0, 60.0), 100.0, 100.0);
        assert_eq!(inside, Point::new(40.0, 60.0));
    }
}
