// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Belegwerk receipt geometry engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one editor invocation.
///
/// Attached to tracing spans so interleaved sessions can be told apart in
/// logs. Sessions are otherwise ephemeral and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JPEG quality used for every processed receipt image.
pub const JPEG_QUALITY: u8 = 90;
