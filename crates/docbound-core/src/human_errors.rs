// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable guidance for detection and capture problems.
//
// A capture UI shows these next to the live preview so the person holding the
// camera knows what to change. The severity drives whether the hint is shown
// at all (transient misses on a single tick are not worth interrupting for).

use crate::error::{DetectionFailure, DocboundError};

/// Severity of a problem from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// One missed tick. The next frame will probably do better.
    Transient,
    /// The user should reposition the document or the camera.
    ActionRequired,
    /// Retrying will not help (broken input, bad configuration).
    Permanent,
}

/// A plain-language message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the next tick may succeed without user action.
    pub retriable: bool,
    pub severity: Severity,
}

/// Explain why the live outline disappeared or never appeared.
pub fn humanize_failure(failure: &DetectionFailure) -> HumanError {
    match failure {
        DetectionFailure::InsufficientEdgeSignal { found: 0, .. } => HumanError {
            message: "We can't see any document edges.".into(),
            suggestion: "Place the document on a darker surface and make sure it's well lit."
                .into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },
        DetectionFailure::InsufficientEdgeSignal { .. } => HumanError {
            message: "The document edges are too faint.".into(),
            suggestion: "Add more light or hold the camera a little steadier.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        DetectionFailure::QuadrantImbalance { .. } | DetectionFailure::InvalidGeometry => {
            HumanError {
                message: "The document is at an awkward angle.".into(),
                suggestion: "Hold the camera directly above the document.".into(),
                retriable: true,
                severity: Severity::Transient,
            }
        }
        DetectionFailure::BoundaryTooSmall { .. } => HumanError {
            message: "The document looks too small.".into(),
            suggestion: "Move the camera closer so the document fills most of the frame.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },
        DetectionFailure::NoQuadrilateralContour => HumanError {
            message: "We can't find all four corners.".into(),
            suggestion: "Make sure the whole document is visible, including its corners.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },
    }
}

/// Explain an API-level error.
pub fn humanize_error(err: &DocboundError) -> HumanError {
    match err {
        DocboundError::FrameSource(_) => HumanError {
            message: "The camera stopped sending pictures.".into(),
            suggestion: "Check that no other app is using the camera, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        DocboundError::InvalidRaster(_) | DocboundError::ImageError(_) => HumanError {
            message: "This picture couldn't be read.".into(),
            suggestion: "Try taking the photo again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        DocboundError::Config(detail) => HumanError {
            message: "The detection settings are invalid.".into(),
            suggestion: format!("Fix the settings file: {detail}"),
            retriable: false,
            severity: Severity::Permanent,
        },
        DocboundError::Serialization(_) => HumanError {
            message: "The settings file is damaged.".into(),
            suggestion: "Delete it to go back to the default settings.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        DocboundError::DetectionLoop(_) | DocboundError::Io(_) => HumanError {
            message: "Something went wrong while scanning.".into(),
            suggestion: "Turn automatic detection off and on again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_needs_user_action() {
        let h = humanize_failure(&DetectionFailure::InsufficientEdgeSignal {
            found: 0,
            required: 50,
        });
        assert_eq!(h.severity, Severity::ActionRequired);
        assert!(h.retriable);
    }

    #[test]
    fn faint_edges_are_transient() {
        let h = humanize_failure(&DetectionFailure::InsufficientEdgeSignal {
            found: 12,
            required: 50,
        });
        assert_eq!(h.severity, Severity::Transient);
    }

    #[test]
    fn small_boundary_asks_to_move_closer() {
        let h = humanize_failure(&DetectionFailure::BoundaryTooSmall {
            width: 40,
            height: 30,
        });
        assert_eq!(h.severity, Severity::ActionRequired);
        assert!(h.suggestion.contains("closer"));
    }

    #[test]
    fn bad_config_is_permanent() {
        let h = humanize_error(&DocboundError::Config("tick_period_ms must be positive".into()));
        assert_eq!(h.severity, Severity::Permanent);
        assert!(!h.retriable);
        assert!(h.suggestion.contains("tick_period_ms"));
    }
}
