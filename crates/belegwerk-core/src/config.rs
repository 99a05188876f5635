// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-invocation editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which interaction backend interprets handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEngine {
    /// Built-in pointer-event handling. Always available.
    Pointer,
    /// The lazily loaded alternate drag backend; falls back to `Pointer`
    /// when the backend cannot be loaded.
    Interact,
}

/// Which strategy rectifies the quadrilateral on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarpEngine {
    /// Full perspective correction through the vision backend.
    Projective,
    /// Bounding-box crop-and-scale. Cannot fail, removes no skew.
    AxisAligned,
}

/// Options for one editor invocation.
///
/// Supplied once per session and immutable for its lifetime. Callers usually
/// hand over a partial options object; [`EditorConfig::from_json`] merges it
/// over the defaults, field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Attempt quadrilateral auto-detection on load.
    pub auto_detect: bool,
    /// Interaction backend for handle dragging.
    pub drag_engine: DragEngine,
    /// Rectification strategy used on apply.
    pub warp_engine: WarpEngine,
    /// Cap on the longer side of the output image, in pixels.
    pub max_long_side: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_detect: true,
            drag_engine: DragEngine::Pointer,
            warp_engine: WarpEngine::Projective,
            max_long_side: 2000,
        }
    }
}

impl EditorConfig {
    /// Merge a partial JSON options object over the defaults.
    ///
    /// Unknown fields are rejected so a typo'd option fails loudly instead of
    /// silently running with defaults.
    pub fn from_json(options: &str) -> Result<Self> {
        Ok(serde_json::from_str(options)?)
    }
}
