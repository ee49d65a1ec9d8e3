// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary detector: one full pass from raster to stored-ready detection.
//
// ## Gradient pipeline
//
// 1. Sample Sobel gradients on a sparse grid
// 2. Too few edge points: give up (the stored boundary stays as it was)
// 3. Partition the strongest points into centroid quadrants, one corner each
// 4. A starved quadrant (or, in strict mode, a malformed shape) falls back to
//    the bounding box of every edge point
// 5. A bounding box under the minimum span: give up

use chrono::Utc;
use docbound_core::{
    BoundaryStrategy, Detection, DetectionConfig, DetectionFailure, EdgePoint, Quadrilateral,
};
use tracing::{debug, instrument};

use super::bounding_box::BoundingBoxFallback;
use super::contour::ContourDetector;
use super::gradient::GradientExtractor;
use super::quadrant::QuadrilateralEstimator;
use crate::frame::Raster;

/// Corners found by a strategy, before they are stamped into a [`Detection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub quad: Quadrilateral,
    /// The quadrant estimator declined and the bounding box was used instead.
    pub used_fallback: bool,
}

/// A raster-to-quadrilateral algorithm.
pub trait CornerStrategy: Send + Sync {
    fn kind(&self) -> BoundaryStrategy;

    fn estimate(&self, raster: &Raster) -> Result<Estimate, DetectionFailure>;
}

/// Sampled gradients, centroid quadrants, bounding-box fallback.
#[derive(Debug, Clone, Copy)]
pub struct GradientStrategy {
    pub extractor: GradientExtractor,
    pub estimator: QuadrilateralEstimator,
    pub fallback: BoundingBoxFallback,
    /// Send malformed quadrant estimates to the fallback instead of
    /// returning them.
    pub strict: bool,
}

impl GradientStrategy {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            extractor: GradientExtractor::new(
                config.gradient_threshold,
                config.min_step_size,
                config.step_divisor,
            ),
            estimator: QuadrilateralEstimator {
                min_edge_points: config.min_edge_points,
                top_k_points: config.top_k_points,
                min_quadrant_points: config.min_quadrant_points,
            },
            fallback: BoundingBoxFallback {
                min_fraction: config.min_bounding_box_fraction,
            },
            strict: config.strict_geometry,
        }
    }

    /// Corners from already-extracted edge points of a
    /// `raster_width x raster_height` raster.
    pub fn estimate_from_edges(
        &self,
        edges: &[EdgePoint],
        raster_width: u32,
        raster_height: u32,
    ) -> Result<Estimate, DetectionFailure> {
        let reason = match self.estimator.estimate(edges) {
            Ok(quad) if !self.strict || quad.is_well_formed() => {
                return Ok(Estimate {
                    quad,
                    used_fallback: false,
                });
            }
            Ok(_) => DetectionFailure::InvalidGeometry,
            Err(insufficient @ DetectionFailure::InsufficientEdgeSignal { .. }) => {
                return Err(insufficient);
            }
            Err(other) => other,
        };

        debug!(%reason, "Quadrant estimate declined; trying bounding box");
        let quad = self.fallback.fit(edges, raster_width, raster_height)?;
        Ok(Estimate {
            quad,
            used_fallback: true,
        })
    }
}

impl CornerStrategy for GradientStrategy {
    fn kind(&self) -> BoundaryStrategy {
        BoundaryStrategy::Gradient
    }

    fn estimate(&self, raster: &Raster) -> Result<Estimate, DetectionFailure> {
        let edges = self.extractor.extract(raster);
        self.estimate_from_edges(&edges, raster.width(), raster.height())
    }
}

impl CornerStrategy for ContourDetector {
    fn kind(&self) -> BoundaryStrategy {
        BoundaryStrategy::Contour
    }

    fn estimate(&self, raster: &Raster) -> Result<Estimate, DetectionFailure> {
        self.detect(raster).map(|quad| Estimate {
            quad,
            used_fallback: false,
        })
    }
}

/// Runs the configured strategy and stamps its result.
pub struct BoundaryDetector {
    strategy: Box<dyn CornerStrategy>,
    strict: bool,
}

impl BoundaryDetector {
    pub fn new(strategy: Box<dyn CornerStrategy>, strict: bool) -> Self {
        Self { strategy, strict }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        let strategy: Box<dyn CornerStrategy> = match config.strategy {
            BoundaryStrategy::Gradient => Box::new(GradientStrategy::from_config(config)),
            BoundaryStrategy::Contour => Box::new(ContourDetector::default()),
        };
        Self::new(strategy, config.strict_geometry)
    }

    pub fn strategy(&self) -> BoundaryStrategy {
        self.strategy.kind()
    }

    /// One detection pass. Pure with respect to the raster: no state is read
    /// or written.
    #[instrument(skip_all, fields(strategy = ?self.strategy.kind(), width = raster.width(), height = raster.height()))]
    pub fn detect(&self, raster: &Raster) -> Result<Detection, DetectionFailure> {
        let estimate = self.strategy.estimate(raster)?;
        if self.strict && !estimate.quad.is_well_formed() {
            return Err(DetectionFailure::InvalidGeometry);
        }

        debug!(
            top_left = ?estimate.quad.top_left,
            top_right = ?estimate.quad.top_right,
            bottom_left = ?estimate.quad.bottom_left,
            bottom_right = ?estimate.quad.bottom_right,
            used_fallback = estimate.used_fallback,
            "Boundary detected"
        );

        Ok(Detection {
            quad: estimate.quad,
            raster_width: raster.width(),
            raster_height: raster.height(),
            strategy: self.strategy.kind(),
            used_fallback: estimate.used_fallback,
            detected_at: Utc::now(),
        })
    }
}
