// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary detection: gradient extraction, quadrant corner estimation, the
// bounding-box fallback, and the contour-approximation alternative.

pub mod bounding_box;
pub mod contour;
pub mod detector;
pub mod gradient;
pub mod quadrant;

pub use bounding_box::BoundingBoxFallback;
pub use contour::ContourDetector;
pub use detector::{BoundaryDetector, CornerStrategy, Estimate, GradientStrategy};
pub use gradient::GradientExtractor;
pub use quadrant::QuadrilateralEstimator;
