// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbound-detect: document boundary detection for live camera frames.
//
// Provides frame sampling, the gradient/quadrant boundary detector with its
// bounding-box fallback, a contour-approximation alternative, crop-area
// derivation, the shared detection state with its periodic loop, and JPEG
// photo capture.

pub mod boundary;
pub mod capture;
pub mod crop;
pub mod detection_loop;
pub mod frame;
pub mod state;

// Re-export the primary types so callers can use `docbound_detect::BoundaryDetector` etc.
pub use boundary::{BoundaryDetector, ContourDetector, CornerStrategy, GradientStrategy};
pub use capture::{CapturedPhoto, PhotoCapture};
pub use crop::CropAreaCalculator;
pub use detection_loop::DetectionLoop;
pub use frame::{FrameSampler, FrameSource, LatestFrameSource, Raster, StillFrameSource};
pub use state::DetectionState;
