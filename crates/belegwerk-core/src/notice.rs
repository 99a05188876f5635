// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable notices for editor failures.
//
// Technical errors are mapped to plain English with a clear suggestion. The
// apply-time warp path is the only one that surfaces a notice to the user;
// everything else degrades silently, but the mapping covers the full error
// taxonomy so surfaces can present any error they are handed.

use crate::error::BelegwerkError;

/// Severity of a notice from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth retrying as-is, possibly after a moment.
    Transient,
    /// The user must change something (adjust corners, pick another engine).
    ActionRequired,
    /// Cannot be fixed from inside the editor — bad input file, etc.
    Permanent,
}

/// A human-readable notice with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanNotice {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the editor stays open so the user can retry in place.
    pub recoverable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `BelegwerkError` into a `HumanNotice`.
pub fn humanize_error(err: &BelegwerkError) -> HumanNotice {
    match err {
        BelegwerkError::Decode(_) => HumanNotice {
            message: "This image can't be read.".into(),
            suggestion: "The photo may be damaged or in an unusual format. Try taking the picture again, or save it as a JPEG or PNG first.".into(),
            recoverable: false,
            severity: Severity::Permanent,
        },

        BelegwerkError::Encode(_) => HumanNotice {
            message: "The processed image couldn't be saved.".into(),
            suggestion: "Try applying again. If this keeps happening, your device may be low on memory.".into(),
            recoverable: true,
            severity: Severity::Transient,
        },

        BelegwerkError::Detection(_) => HumanNotice {
            message: "We couldn't find the receipt's edges automatically.".into(),
            suggestion: "Drag the corner points onto the receipt's corners yourself, then apply.".into(),
            recoverable: true,
            severity: Severity::ActionRequired,
        },

        BelegwerkError::Warp(detail) => HumanNotice {
            message: "We couldn't straighten the receipt.".into(),
            suggestion: format!(
                "Try moving the corner points so they form a proper four-sided shape, then apply again. ({detail})"
            ),
            recoverable: true,
            severity: Severity::ActionRequired,
        },

        BelegwerkError::BackendUnavailable => HumanNotice {
            message: "Advanced straightening isn't available right now.".into(),
            suggestion: "A simple crop will be used instead. You can still adjust the corners before applying.".into(),
            recoverable: true,
            severity: Severity::Transient,
        },

        BelegwerkError::Io(_) => HumanNotice {
            message: "There was a problem reading or writing a file.".into(),
            suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
            recoverable: true,
            severity: Severity::Transient,
        },

        BelegwerkError::Options(_) => HumanNotice {
            message: "The editor was opened with invalid options.".into(),
            suggestion: "This is an application bug — please report it.".into(),
            recoverable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failure_is_permanent() {
        let notice = humanize_error(&BelegwerkError::Decode("bad magic".into()));
        assert_eq!(notice.severity, Severity::Permanent);
        assert!(!notice.recoverable);
    }

    #[test]
    fn warp_failure_is_recoverable_in_place() {
        let notice = humanize_error(&BelegwerkError::Warp("singular matrix".into()));
        assert_eq!(notice.severity, Severity::ActionRequired);
        assert!(notice.recoverable);
    }

    #[test]
    fn missing_backend_is_transient() {
        let notice = humanize_error(&BelegwerkError::BackendUnavailable);
        assert_eq!(notice.severity, Severity::Transient);
        assert!(notice.recoverable);
    }
}
