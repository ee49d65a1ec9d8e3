// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounding-box fallback for when quadrant partitioning gives up.

use docbound_core::{DetectionFailure, EdgePoint, Point, Quadrilateral};
use tracing::debug;

/// Axis-aligned bounding box over every edge point.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxFallback {
    /// The box must span at least this fraction of the raster on both axes.
    pub min_fraction: f64,
}

impl BoundingBoxFallback {
    /// Box the full, unfiltered edge set.
    ///
    /// Rejects boxes narrower or shorter than `min_fraction` of the raster so
    /// a speck of texture never replaces a real boundary.
    pub fn fit(
        &self,
        points: &[EdgePoint],
        raster_width: u32,
        raster_height: u32,
    ) -> Result<Quadrilateral, DetectionFailure> {
        let Some(first) = points.first() else {
            return Err(DetectionFailure::BoundaryTooSmall {
                width: 0,
                height: 0,
            });
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        let min_width = raster_width as f64 * self.min_fraction;
        let min_height = raster_height as f64 * self.min_fraction;
        if (width as f64) < min_width || (height as f64) < min_height {
            debug!(width, height, min_width, min_height, "Bounding box too small");
            return Err(DetectionFailure::BoundaryTooSmall { width, height });
        }

        Ok(Quadrilateral {
            top_left: Point::new(min_x, min_y),
            top_right: Point::new(max_x, min_y),
            bottom_left: Point::new(min_x, max_y),
            bottom_right: Point::new(max_x, max_y),
        })
    }
}
