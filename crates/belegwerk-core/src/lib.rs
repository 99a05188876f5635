// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Belegwerk — Core types, geometry utilities, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod notice;
pub mod types;

pub use config::{DragEngine, EditorConfig, WarpEngine};
pub use error::BelegwerkError;
pub use geometry::{FitSize, Point, Quad, ScreenPoint, ViewTransform, fit_within_bound};
pub use types::*;
