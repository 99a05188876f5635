// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input vocabulary for the edit session.
//
// Hosts translate their native pointer/wheel/keyboard events into these and
// feed them to the session controller over a channel. Positions are in stage
// space: relative to the surface's untransformed origin, before the session's
// own pan/zoom is taken into account.

use belegwerk_core::geometry::ScreenPoint;

/// Identifies one pointer (finger, pen, mouse) across a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// A low-level interaction event from the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { id: PointerId, at: ScreenPoint },
    PointerMove { id: PointerId, at: ScreenPoint },
    PointerUp { id: PointerId },
    PointerCancel { id: PointerId },
    /// One wheel notch; positive `delta_y` scrolls away from the user.
    Wheel { delta_y: f32, at: ScreenPoint },
    /// The escape key — resolves the session as cancelled.
    Escape,
}

/// A toolbar-level command from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Warp the current quadrilateral and resolve with the result.
    Apply,
    /// Re-run detection on the current raster, keeping the quad on failure.
    Reset,
    /// Rotate the working raster 90° clockwise.
    Rotate,
    /// Resolve the session with no result.
    Cancel,
}

/// Everything the session controller can receive while a session is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    Input(InputEvent),
    Command(EditorCommand),
}
