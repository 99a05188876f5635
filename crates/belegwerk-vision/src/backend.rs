// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Vision backend capability — detection and projective warping behind one
// trait, with a null object standing in when no backend is available.

use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_core::geometry::Quad;
use image::DynamicImage;

use crate::detect::detect_document_quad;
use crate::warp::warp_projective;

/// The optional computer-vision capability of an edit session.
///
/// Sessions receive an implementation through the injected backend loader.
/// Detection failure is modelled as `None` (the session keeps its default
/// quadrilateral); a warp error of `BackendUnavailable` tells the caller to
/// use the axis-aligned fallback instead.
pub trait VisionBackend: Send + Sync {
    /// Best-guess document quadrilateral, or `None` when nothing was found.
    fn detect_quadrilateral(&self, image: &DynamicImage) -> Option<Quad>;

    /// Rectify `quad` out of `image`, bounded by `max_long_side`.
    fn warp_perspective(
        &self,
        image: &DynamicImage,
        quad: &Quad,
        max_long_side: u32,
    ) -> Result<DynamicImage>;
}

/// The bundled contour-based implementation.
pub struct ContourVision;

impl VisionBackend for ContourVision {
    fn detect_quadrilateral(&self, image: &DynamicImage) -> Option<Quad> {
        detect_document_quad(image)
    }

    fn warp_perspective(
        &self,
        image: &DynamicImage,
        quad: &Quad,
        max_long_side: u32,
    ) -> Result<DynamicImage> {
        Ok(warp_projective(image, quad, max_long_side))
    }
}

/// Null object used when no vision backend could be loaded.
///
/// Detection finds nothing and warping reports the backend as unavailable,
/// which routes callers onto the degraded axis-aligned path. Keeping the
/// absent case behind the same trait keeps both paths statically visible.
pub struct NullVision;

impl VisionBackend for NullVision {
    fn detect_quadrilateral(&self, _image: &DynamicImage) -> Option<Quad> {
        tracing::debug!("NullVision::detect_quadrilateral — no backend loaded");
        None
    }

    fn warp_perspective(
        &self,
        _image: &DynamicImage,
        _quad: &Quad,
        _max_long_side: u32,
    ) -> Result<DynamicImage> {
        tracing::debug!("NullVision::warp_perspective — no backend loaded");
        Err(BelegwerkError::BackendUnavailable)
    }
}

// -- Tests --------------------------------------------------------------------
