// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docbound.
//
// Two families: `DocboundError` for API-surface failures (bad input buffers,
// frame sources, encoding, configuration) and `DetectionFailure` for the
// per-pass outcomes the detection loop absorbs without surfacing.

use thiserror::Error;

/// Top-level error type for docbound operations.
#[derive(Debug, Error)]
pub enum DocboundError {
    // -- Frame input --
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("frame source error: {0}")]
    FrameSource(String),

    // -- Imaging --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Runtime --
    #[error("detection loop error: {0}")]
    DetectionLoop(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single detection pass produced no boundary.
///
/// None of these are fatal. The detection loop logs them and leaves the
/// previously stored boundary untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionFailure {
    /// Too few strong edge points to attempt corner estimation. A degenerate
    /// (too small or uniform) raster lands here with `found == 0`.
    #[error("insufficient edge signal: {found} points, need more than {required}")]
    InsufficientEdgeSignal { found: usize, required: usize },

    /// At least one centroid quadrant held too few points.
    /// Counts are ordered top-left, top-right, bottom-left, bottom-right.
    #[error("quadrant imbalance: point counts {counts:?}")]
    QuadrantImbalance { counts: [usize; 4] },

    /// Strict mode rejected a self-intersecting or mis-ordered quadrilateral.
    #[error("estimated quadrilateral is not convex or its corners are mis-ordered")]
    InvalidGeometry,

    /// The fallback bounding box is smaller than the minimum raster fraction.
    #[error("boundary too small: {width}x{height} px")]
    BoundaryTooSmall { width: u32, height: u32 },

    /// The contour strategy found no contour approximating to four vertices.
    #[error("no four-vertex contour found")]
    NoQuadrilateralContour,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocboundError>;
