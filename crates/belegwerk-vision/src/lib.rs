// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// belegwerk-vision — Raster processing and document geometry for Belegwerk.
//
// Provides the raster decode/encode/transform pipeline, contour-based
// quadrilateral detection, perspective warping with an axis-aligned crop
// fallback, and the vision backend capability trait.

pub mod backend;
pub mod detect;
pub mod raster;
pub mod warp;

// Re-export the primary types so callers can use `belegwerk_vision::Raster` etc.
pub use backend::{ContourVision, NullVision, VisionBackend};
pub use detect::detect_document_quad;
pub use raster::Raster;
pub use warp::{axis_aligned_crop, warp_projective};
