// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DocboundError, Result};

/// Which corner-finding strategy the detector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    /// Sampled Sobel gradients, centroid quadrants, bounding-box fallback.
    #[default]
    Gradient,
    /// Canny edges, contour tracing, and polygon approximation.
    Contour,
}

/// Tunables for the boundary-detection pipeline.
///
/// Missing fields in a JSON file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum Sobel magnitude for a sampled pixel to count as an edge.
    pub gradient_threshold: f32,
    /// Lower bound on the sampling stride in pixels.
    pub min_step_size: u32,
    /// The stride is `min(W, H) / step_divisor`, clamped below by `min_step_size`.
    pub step_divisor: u32,
    /// The quadrant estimator needs strictly more edge points than this.
    pub min_edge_points: usize,
    /// Strongest edge points kept before quadrant partitioning.
    pub top_k_points: usize,
    /// Minimum points per centroid quadrant.
    pub min_quadrant_points: usize,
    /// Minimum span of the fallback bounding box, as a fraction of each raster axis.
    pub min_bounding_box_fraction: f64,
    /// Period of the detection loop.
    pub tick_period_ms: u64,
    /// Corner-finding strategy.
    pub strategy: BoundaryStrategy,
    /// Reject estimated quadrilaterals that are not convex and correctly ordered.
    pub strict_geometry: bool,
    /// Fixed `(width, height)` of the detection raster. `None` samples frames
    /// at the source's native resolution.
    pub detection_size: Option<(u32, u32)>,
    /// JPEG quality for captured photos (1–100).
    pub jpeg_quality: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            gradient_threshold: 40.0,
            min_step_size: 5,
            step_divisor: 100,
            min_edge_points: 50,
            top_k_points: 500,
            min_quadrant_points: 5,
            min_bounding_box_fraction: 0.2,
            tick_period_ms: 200,
            strategy: BoundaryStrategy::Gradient,
            strict_geometry: false,
            detection_size: None,
            jpeg_quality: 95,
        }
    }
}

impl DetectionConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON and write it to `path`.
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Check that every tunable is within a usable range.
    pub fn validate(&self) -> Result<()> {
        if !self.gradient_threshold.is_finite() || self.gradient_threshold < 0.0 {
            return Err(DocboundError::Config(format!(
                "gradient_threshold must be a non-negative number, got {}",
                self.gradient_threshold
            )));
        }
        if self.min_step_size == 0 {
            return Err(DocboundError::Config("min_step_size must be at least 1".into()));
        }
        if self.step_divisor == 0 {
            return Err(DocboundError::Config("step_divisor must be at least 1".into()));
        }
        if self.top_k_points == 0 {
            return Err(DocboundError::Config("top_k_points must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.min_bounding_box_fraction) {
            return Err(DocboundError::Config(format!(
                "min_bounding_box_fraction must lie in [0, 1], got {}",
                self.min_bounding_box_fraction
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(DocboundError::Config("tick_period_ms must be positive".into()));
        }
        if let Some((w, h)) = self.detection_size {
            if w == 0 || h == 0 {
                return Err(DocboundError::Config(format!(
                    "detection_size must be non-zero, got {w}x{h}"
                )));
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DocboundError::Config(format!(
                "jpeg_quality must lie in [1, 100], got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Sampling stride for a raster of the given size.
    pub fn step_size(&self, width: u32, height: u32) -> u32 {
        (width.min(height) / self.step_divisor).max(self.min_step_size)
    }

    /// Detection loop period as a `Duration`.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
