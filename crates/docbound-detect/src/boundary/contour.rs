// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour-approximation detector: the alternative to the gradient/quadrant
// heuristic. Traces closed edge contours and keeps the largest one that
// simplifies to four vertices.

use docbound_core::{DetectionFailure, Point, Quadrilateral};
use image::imageops;
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::dilate;
use imageproc::point::Point as PixelPoint;
use tracing::{debug, instrument};

use crate::frame::Raster;

/// Tunables for [`ContourDetector`].
#[derive(Debug, Clone, Copy)]
pub struct ContourDetector {
    /// Gaussian sigma applied before edge detection.
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Dilation radius (L∞) used to close small gaps in the edge map.
    pub dilate_radius: u8,
    /// How many of the largest contours are tried.
    pub candidates: usize,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub epsilon_fraction: f64,
}

impl Default for ContourDetector {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            canny_low: 75.0,
            canny_high: 200.0,
            dilate_radius: 1,
            candidates: 5,
            epsilon_fraction: 0.02,
        }
    }
}

impl ContourDetector {
    /// Find the largest four-vertex contour and label its corners.
    #[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    pub fn detect(&self, raster: &Raster) -> Result<Quadrilateral, DetectionFailure> {
        if raster.is_empty() {
            return Err(DetectionFailure::NoQuadrilateralContour);
        }

        let gray = imageops::grayscale(raster.as_image());
        let blurred = gaussian_blur_f32(&gray, self.blur_sigma);
        let edges = canny(&blurred, self.canny_low, self.canny_high);
        let closed = dilate(&edges, Norm::LInf, self.dilate_radius);

        let contours = find_contours::<i32>(&closed);
        debug!(contours = contours.len(), "Contours traced");

        let mut by_area: Vec<(f64, &[PixelPoint<i32>])> = contours
            .iter()
            .filter(|c| c.points.len() >= 4)
            .map(|c| (polygon_area(&c.points), c.points.as_slice()))
            .collect();
        by_area.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (area, points) in by_area.into_iter().take(self.candidates) {
            let perimeter = arc_length(points, true);
            if perimeter <= 0.0 {
                continue;
            }
            let approx = approximate_polygon_dp(points, self.epsilon_fraction * perimeter, true);
            if approx.len() == 4 {
                debug!(area, perimeter, "Four-vertex contour found");
                let corners = [0, 1, 2, 3].map(|i| Point::new(approx[i].x, approx[i].y));
                return Ok(label_corners(corners));
            }
        }

        Err(DetectionFailure::NoQuadrilateralContour)
    }
}

/// Absolute shoelace area of a closed polygon.
fn polygon_area(points: &[PixelPoint<i32>]) -> f64 {
    let n = points.len();
    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

/// Split four vertices into a top pair and a bottom pair by y, then order
/// each pair by x.
fn label_corners(mut corners: [Point; 4]) -> Quadrilateral {
    corners.sort_by_key(|p| (p.y, p.x));
    let (top, bottom) = corners.split_at_mut(2);
    top.sort_by_key(|p| p.x);
    bottom.sort_by_key(|p| p.x);
    Quadrilateral {
        top_left: top[0],
        top_right: top[1],
        bottom_left: bottom[0],
        bottom_right: bottom[1],
    }
}
