// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Surface capability — what the edit session needs from its host: a base
// canvas, an overlay, a view transform, and somewhere to show a failure
// notice. A canvas-backed UI and the headless test surface implement the
// same trait, so the session logic never touches a real screen directly.

use belegwerk_core::geometry::{Quad, ViewTransform};
use belegwerk_core::notice::HumanNotice;
use image::DynamicImage;

use crate::loupe::Loupe;

/// Radius of the drawn corner handles, in image pixels.
const HANDLE_RADIUS: f32 = 8.0;

/// One frame of overlay content: the quadrilateral outline, its corner
/// handles, and the loupe while a handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    pub quad: Quad,
    pub handle_radius: f32,
    pub loupe: Option<Loupe>,
}

impl OverlayFrame {
    pub fn new(quad: Quad, loupe: Option<Loupe>) -> Self {
        Self {
            quad,
            handle_radius: HANDLE_RADIUS,
            loupe,
        }
    }
}

/// Host-rendering capability for one edit session.
///
/// The session owns the call order: `draw_base` whenever the working raster
/// changes (load, rotation), `draw_overlay` after every quadrilateral or
/// gesture change, `apply_view` when pan/zoom moves, `show_notice` on a
/// recoverable apply failure, and `teardown` exactly once on resolution.
pub trait Surface {
    /// Present a new working raster. Replaces any previous base image.
    fn draw_base(&mut self, image: &DynamicImage);

    /// Redraw the overlay: outline, handles, optional loupe.
    fn draw_overlay(&mut self, frame: &OverlayFrame);

    /// Apply the pan/zoom transform to both canvases.
    fn apply_view(&mut self, view: &ViewTransform);

    /// Show a non-fatal failure notice; the session stays open.
    fn show_notice(&mut self, notice: &HumanNotice);

    /// Release everything — the session has resolved.
    fn teardown(&mut self);
}

/// Recording surface for tests and headless use.
///
/// Stores every call so tests can assert on what a real UI would have
/// rendered, in order, without a display server.
#[derive(Default)]
pub struct HeadlessSurface {
    /// Dimensions of each base raster drawn, in draw order.
    pub base_draws: Vec<(u32, u32)>,
    pub overlay_frames: Vec<OverlayFrame>,
    pub views: Vec<ViewTransform>,
    pub notices: Vec<HumanNotice>,
    pub torn_down: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently drawn overlay frame.
    pub fn last_overlay(&self) -> Option<&OverlayFrame> {
        self.overlay_frames.last()
    }
}

impl Surface for HeadlessSurface {
    fn draw_base(&mut self, image: &DynamicImage) {
        self.base_draws.push((image.width(), image.height()));
    }

    fn draw_overlay(&mut self, frame: &OverlayFrame) {
        self.overlay_frames.push(*frame);
    }

    fn apply_view(&mut self, view: &ViewTransform) {
        self.views.push(*view);
    }

    fn show_notice(&mut self, notice: &HumanNotice) {
        self.notices.push(notice.clone());
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}
