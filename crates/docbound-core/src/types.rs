// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometry types for document boundary detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BoundaryStrategy;

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A sampled pixel whose gradient exceeded the edge threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePoint {
    pub x: i32,
    pub y: i32,
    /// `sqrt(gx² + gy²)` of the 3x3 Sobel response.
    pub gradient_magnitude: f32,
    /// `atan2(gy, gx)` in radians.
    pub angle: f32,
}

impl EdgePoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Four labelled corners approximating a document outline.
///
/// Labels are assigned positionally by whichever strategy produced the shape;
/// nothing here guarantees that `top_left` is actually left of `top_right`.
/// Use [`Quadrilateral::is_well_formed`] when that matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl Quadrilateral {
    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn outline(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    /// Axis-aligned extent `(min_x, min_y, max_x, max_y)` of the four corners.
    pub fn extent(&self) -> (i32, i32, i32, i32) {
        let corners = self.outline();
        let min_x = corners.iter().map(|p| p.x).min().unwrap_or(0);
        let min_y = corners.iter().map(|p| p.y).min().unwrap_or(0);
        let max_x = corners.iter().map(|p| p.x).max().unwrap_or(0);
        let max_y = corners.iter().map(|p| p.y).max().unwrap_or(0);
        (min_x, min_y, max_x, max_y)
    }

    /// Rescale every corner, rounding to the nearest pixel.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let scale = |p: Point| {
            Point::new(
                (p.x as f64 * sx).round() as i32,
                (p.y as f64 * sy).round() as i32,
            )
        };
        Self {
            top_left: scale(self.top_left),
            top_right: scale(self.top_right),
            bottom_left: scale(self.bottom_left),
            bottom_right: scale(self.bottom_right),
        }
    }

    /// True when the outline is strictly convex, winds clockwise in image
    /// coordinates (y down), and each label sits on the correct side of its
    /// neighbours.
    pub fn is_well_formed(&self) -> bool {
        let labels_ordered = self.top_left.x < self.top_right.x
            && self.bottom_left.x < self.bottom_right.x
            && self.top_left.y < self.bottom_left.y
            && self.top_right.y < self.bottom_right.y;
        if !labels_ordered {
            return false;
        }

        // Every turn along the outline must bend the same way. With y pointing
        // down, a clockwise walk gives positive cross products.
        let corners = self.outline();
        (0..4).all(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let c = corners[(i + 2) % 4];
            let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64
                - (b.y - a.y) as i64 * (c.x - b.x) as i64;
            cross > 0
        })
    }
}

/// Axis-aligned crop region in video pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A stored detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Corners in raster coordinates.
    pub quad: Quadrilateral,
    /// Width of the raster the corners were measured in.
    pub raster_width: u32,
    /// Height of the raster the corners were measured in.
    pub raster_height: u32,
    /// Strategy that produced the corners.
    pub strategy: BoundaryStrategy,
    /// Whether the quadrant estimator gave way to the bounding-box fallback.
    pub used_fallback: bool,
    pub detected_at: DateTime<Utc>,
}

impl Detection {
    /// The corners mapped into a frame of a different resolution.
    pub fn quad_for_frame(&self, frame_width: u32, frame_height: u32) -> Quadrilateral {
        if self.raster_width == 0
            || self.raster_height == 0
            || (frame_width == self.raster_width && frame_height == self.raster_height)
        {
            return self.quad;
        }
        self.quad.scaled(
            frame_width as f64 / self.raster_width as f64,
            frame_height as f64 / self.raster_height as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Quadrilateral {
        Quadrilateral {
            top_left: Point::new(x0, y0),
            top_right: Point::new(x1, y0),
            bottom_left: Point::new(x0, y1),
            bottom_right: Point::new(x1, y1),
        }
    }

    #[test]
    fn rectangle_is_well_formed() {
        assert!(rect(10, 10, 90, 60).is_well_formed());
    }

    #[test]
    fn crossed_labels_are_not_well_formed() {
        let mut quad = rect(10, 10, 90, 60);
        std::mem::swap(&mut quad.bottom_left, &mut quad.bottom_right);
        assert!(!quad.is_well_formed());
    }

    #[test]
    fn concave_shape_is_not_well_formed() {
        // Bottom-right pulled inward past the diagonal.
        let quad = Quadrilateral {
            top_left: Point::new(0, 0),
            top_right: Point::new(100, 0),
            bottom_left: Point::new(0, 100),
            bottom_right: Point::new(30, 30),
        };
        assert!(!quad.is_well_formed());
    }

    #[test]
    fn skewed_convex_shape_is_well_formed() {
        let quad = Quadrilateral {
            top_left: Point::new(120, 60),
            top_right: Point::new(500, 90),
            bottom_left: Point::new(90, 410),
            bottom_right: Point::new(530, 380),
        };
        assert!(quad.is_well_formed());
    }

    #[test]
    fn extent_covers_all_corners() {
        let quad = Quadrilateral {
            top_left: Point::new(120, 60),
            top_right: Point::new(500, 90),
            bottom_left: Point::new(90, 410),
            bottom_right: Point::new(530, 380),
        };
        assert_eq!(quad.extent(), (90, 60, 530, 410));
    }

    #[test]
    fn detection_rescales_to_frame() {
        let detection = Detection {
            quad: rect(100, 80, 540, 400),
            raster_width: 640,
            raster_height: 480,
            strategy: BoundaryStrategy::Gradient,
            used_fallback: false,
            detected_at: Utc::now(),
        };
        assert_eq!(detection.quad_for_frame(640, 480), detection.quad);
        assert_eq!(detection.quad_for_frame(1280, 960), rect(200, 160, 1080, 800));
    }
}
