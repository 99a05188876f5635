// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The edit session — working raster, quadrilateral, view transform, and
// gesture state for one editor invocation.
//
// Every mutation goes through a per-event transition method, so the whole
// machine is drivable from tests with synthetic events. Hit-testing and
// corner mutation happen in image space; the view transform is inverted
// exactly once on the way in.

use std::collections::HashMap;
use std::sync::Arc;

use belegwerk_core::geometry::{
    Point, Quad, ScreenPoint, ViewTransform, distance, screen_distance,
};
use image::DynamicImage;
use tracing::debug;

use crate::drag::DragBackend;
use crate::events::{InputEvent, PointerId};
use crate::loupe::Loupe;
use crate::surface::OverlayFrame;

/// Wheel zoom step per notch.
const WHEEL_ZOOM_STEP: f32 = 0.1;

/// The gesture currently in progress.
///
/// Exactly one gesture is active at a time. A second concurrent pointer
/// always converts the gesture into a pinch; it reverts to `Idle` (not to
/// the prior gesture) when a finger lifts, so a stale pan or drag can never
/// resume with outdated state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// `pointer` is dragging the quadrilateral corner at `corner`.
    DraggingHandle { pointer: PointerId, corner: usize },
    /// `pointer` is translating the view; `last` is its previous position.
    Panning { pointer: PointerId, last: ScreenPoint },
    /// Two pointers are zooming; `last_spread` is their previous distance.
    Pinching { last_spread: f32 },
}

/// Mutable state of one open editor.
///
/// Owned by the session controller for the lifetime of a single invocation
/// and dropped on resolution. The quadrilateral always stays in image space;
/// the view transform is presentation-only.
pub struct EditSession {
    raster: DynamicImage,
    quad: Quad,
    view: ViewTransform,
    pointers: HashMap<PointerId, ScreenPoint>,
    gesture: Gesture,
    drag: Arc<dyn DragBackend>,
}

impl EditSession {
    pub fn new(raster: DynamicImage, quad: Quad, drag: Arc<dyn DragBackend>) -> Self {
        Self {
            raster,
            quad,
            view: ViewTransform::IDENTITY,
            pointers: HashMap::new(),
            gesture: Gesture::Idle,
            drag,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    /// Replace the quadrilateral (detection reset).
    pub fn set_quad(&mut self, quad: Quad) {
        self.quad = quad;
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    fn raster_width(&self) -> f32 {
        self.raster.width() as f32
    }

    fn raster_height(&self) -> f32 {
        self.raster.height() as f32
    }

    /// The overlay content for the current state: outline, handles, and the
    /// loupe while a corner is being dragged.
    pub fn overlay_frame(&self) -> OverlayFrame {
        let loupe = match self.gesture {
            Gesture::DraggingHandle { corner, .. } => Some(Loupe::around(
                self.quad.corner(corner),
                self.raster_width(),
                self.raster_height(),
            )),
            _ => None,
        };
        OverlayFrame::new(self.quad, loupe)
    }

    // -- Event dispatch -------------------------------------------------------

    /// Feed one input event through the gesture state machine.
    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { id, at } => self.pointer_down(id, at),
            InputEvent::PointerMove { id, at } => self.pointer_move(id, at),
            InputEvent::PointerUp { id } | InputEvent::PointerCancel { id } => self.pointer_up(id),
            InputEvent::Wheel { delta_y, at } => self.wheel(delta_y, at),
            // Escape resolves the session; the controller handles it.
            InputEvent::Escape => {}
        }
    }

    // -- Transitions ----------------------------------------------------------

    fn pointer_down(&mut self, id: PointerId, at: ScreenPoint) {
        self.pointers.insert(id, at);

        if self.pointers.len() == 2 {
            // Second finger: whatever was happening becomes a pinch.
            self.gesture = Gesture::Pinching {
                last_spread: self.pointer_spread(),
            };
            return;
        }
        if self.pointers.len() > 2 {
            // Third and later fingers don't change the gesture.
            return;
        }

        let image_pt = self.view.screen_to_image(at);
        match self.hit_corner(image_pt) {
            Some(corner) => {
                debug!(corner, "handle drag started");
                self.gesture = Gesture::DraggingHandle { pointer: id, corner };
            }
            None => {
                self.gesture = Gesture::Panning { pointer: id, last: at };
            }
        }
    }

    fn pointer_move(&mut self, id: PointerId, at: ScreenPoint) {
        // A pointer we never saw go down owns no gesture.
        if let Some(position) = self.pointers.get_mut(&id) {
            *position = at;
        } else {
            return;
        }

        match self.gesture {
            Gesture::DraggingHandle { pointer, corner } if pointer == id => {
                let raw = self.view.screen_to_image(at);
                let placed = self
                    .drag
                    .drag_to(raw, self.raster_width(), self.raster_height());
                self.quad.set_corner(corner, placed);
            }
            Gesture::Panning { pointer, last } if pointer == id => {
                self.view.pan_by(at.x - last.x, at.y - last.y);
                self.gesture = Gesture::Panning { pointer, last: at };
            }
            Gesture::Pinching { last_spread } => {
                if self.pointers.len() != 2 {
                    return;
                }
                let spread = self.pointer_spread();
                let factor = if last_spread > 0.0 {
                    spread / last_spread
                } else {
                    1.0
                };
                let midpoint = self.pointer_midpoint();
                let target = self.view.zoom * factor;
                self.view.focal_zoom(midpoint, target);
                self.gesture = Gesture::Pinching {
                    last_spread: spread,
                };
            }
            _ => {}
        }
    }

    fn pointer_up(&mut self, id: PointerId) {
        self.pointers.remove(&id);

        match self.gesture {
            Gesture::Pinching { .. } => {
                if self.pointers.len() < 2 {
                    self.gesture = Gesture::Idle;
                }
            }
            Gesture::DraggingHandle { pointer, .. } | Gesture::Panning { pointer, .. }
                if pointer == id =>
            {
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
    }

    fn wheel(&mut self, delta_y: f32, at: ScreenPoint) {
        let step = if delta_y < 0.0 {
            WHEEL_ZOOM_STEP
        } else if delta_y > 0.0 {
            -WHEEL_ZOOM_STEP
        } else {
            return;
        };
        let target = self.view.zoom + step;
        self.view.focal_zoom(at, target);
    }

    /// Rotate the working raster 90° clockwise.
    ///
    /// Destructive: later warps operate on the rotated pixels. Corners are
    /// remapped, the view resets to identity, and all gesture state clears.
    pub fn rotate(&mut self) {
        let old_height = self.raster_height();
        self.raster = self.raster.rotate90();
        self.quad = self.quad.rotate_cw(old_height);
        self.view = ViewTransform::IDENTITY;
        self.pointers.clear();
        self.gesture = Gesture::Idle;
        debug!(
            width = self.raster.width(),
            height = self.raster.height(),
            "raster rotated 90° clockwise"
        );
    }

    // -- Helpers --------------------------------------------------------------

    /// Index of the first corner within the drag backend's hit radius of
    /// `image_pt`, if any.
    fn hit_corner(&self, image_pt: Point) -> Option<usize> {
        let radius = self.drag.hit_radius();
        (0..4).find(|&i| distance(self.quad.corner(i), image_pt) <= radius)
    }

    fn pointer_spread(&self) -> f32 {
        let mut values = self.pointers.values();
        match (values.next(), values.next()) {
            (Some(&a), Some(&b)) => screen_distance(a, b),
            _ => 0.0,
        }
    }

    fn pointer_midpoint(&self) -> ScreenPoint {
        let mut values = self.pointers.values();
        match (values.next(), values.next()) {
            (Some(&a), Some(&b)) => ScreenPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
            _ => ScreenPoint::new(0.0, 0.0),
        }
    }
}

// -- Tests --------------------------------------------------------------------
