// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral estimation: one extremal corner per centroid quadrant.

use std::cmp::Ordering;

use docbound_core::{DetectionFailure, EdgePoint, Point, Quadrilateral};
use tracing::{debug, trace};

/// Outward direction of each corner, in quadrant order TL, TR, BL, BR.
const CORNER_DIRECTIONS: [(i64, i64); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Splits strong edge points around their centroid and picks, in each
/// quadrant, the point furthest toward that quadrant's outer corner.
#[derive(Debug, Clone, Copy)]
pub struct QuadrilateralEstimator {
    /// The input must hold strictly more points than this.
    pub min_edge_points: usize,
    /// Strongest points kept before partitioning.
    pub top_k_points: usize,
    /// Every quadrant must hold at least this many points.
    pub min_quadrant_points: usize,
}

impl QuadrilateralEstimator {
    /// Estimate the document corners.
    ///
    /// The caller's slice is left in scan order; ranking by magnitude happens
    /// on a local copy. Ties in the corner score go to whichever point comes
    /// first after that ranking.
    pub fn estimate(&self, points: &[EdgePoint]) -> Result<Quadrilateral, DetectionFailure> {
        if points.len() <= self.min_edge_points {
            return Err(DetectionFailure::InsufficientEdgeSignal {
                found: points.len(),
                required: self.min_edge_points,
            });
        }

        let strongest = strongest_points(points, self.top_k_points);
        let (cx, cy) = centroid(&strongest);
        trace!(cx, cy, retained = strongest.len(), "Edge centroid computed");

        let mut quadrants: [Vec<Point>; 4] = Default::default();
        for p in &strongest {
            let right = p.x as f64 >= cx;
            let lower = p.y as f64 >= cy;
            let index = usize::from(right) + 2 * usize::from(lower);
            quadrants[index].push(p.point());
        }

        let counts = quadrants.each_ref().map(Vec::len);
        if counts.iter().any(|&n| n < self.min_quadrant_points.max(1)) {
            debug!(?counts, "Quadrant imbalance");
            return Err(DetectionFailure::QuadrantImbalance { counts });
        }

        let [tl, tr, bl, br] = [0, 1, 2, 3].map(|i| extremal(&quadrants[i], CORNER_DIRECTIONS[i]));
        Ok(Quadrilateral {
            top_left: tl,
            top_right: tr,
            bottom_left: bl,
            bottom_right: br,
        })
    }
}

/// The `k` strongest points, strongest first. Equal magnitudes keep scan order.
fn strongest_points(points: &[EdgePoint], k: usize) -> Vec<EdgePoint> {
    let mut ranked = points.to_vec();
    ranked.sort_by(|a, b| {
        b.gradient_magnitude
            .partial_cmp(&a.gradient_magnitude)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

fn centroid(points: &[EdgePoint]) -> (f64, f64) {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    (sx / n, sy / n)
}

/// The point maximising `dx*x + dy*y`; the first maximum wins.
fn extremal(points: &[Point], (dx, dy): (i64, i64)) -> Point {
    let score = |p: &Point| dx * p.x as i64 + dy * p.y as i64;
    let mut best = points[0];
    let mut best_score = score(&best);
    for p in &points[1..] {
        let s = score(p);
        if s > best_score {
            best = *p;
            best_score = s;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> QuadrilateralEstimator {
        QuadrilateralEstimator {
            min_edge_points: 50,
            top_k_points: 500,
            min_quadrant_points: 5,
        }
    }

    fn edge(x: i32, y: i32, magnitude: f32) -> EdgePoint {
        EdgePoint {
            x,
            y,
            gradient_magnitude: magnitude,
            angle: 0.0,
        }
    }

    /// Points along the outline of an axis-aligned rectangle, in scan order.
    fn rectangle_outline(x0: i32, y0: i32, x1: i32, y1: i32, step: i32) -> Vec<EdgePoint> {
        let mut points = Vec::new();
        let mut y = y0;
        while y <= y1 {
            let mut x = x0;
            while x <= x1 {
                if x == x0 || x == x1 || y == y0 || y == y1 {
                    points.push(edge(x, y, 500.0));
                }
                x += step;
            }
            y += step;
        }
        points
    }

    #[test]
    fn finds_rectangle_corners() {
        let points = rectangle_outline(100, 80, 540, 400, 5);
        let quad = estimator().estimate(&points).unwrap();
        assert_eq!(quad.top_left, Point::new(100, 80));
        assert_eq!(quad.top_right, Point::new(540, 80));
        assert_eq!(quad.bottom_left, Point::new(100, 400));
        assert_eq!(quad.bottom_right, Point::new(540, 400));
    }

    #[test]
    fn too_few_points_is_insufficient() {
        let points: Vec<_> = (0..50).map(|i| edge(i * 3, i * 2, 100.0)).collect();
        assert_eq!(
            estimator().estimate(&points),
            Err(DetectionFailure::InsufficientEdgeSignal {
                found: 50,
                required: 50
            })
        );
    }

    #[test]
    fn single_line_is_quadrant_imbalance() {
        // Every point sits exactly on cy, which counts as the lower half.
        let points: Vec<_> = (0..80).map(|i| edge(10 + i * 5, 200, 300.0)).collect();
        match estimator().estimate(&points) {
            Err(DetectionFailure::QuadrantImbalance { counts }) => {
                assert_eq!(counts[0] + counts[1], 0);
                assert_eq!(counts[2] + counts[3], 80);
            }
            other => panic!("expected quadrant imbalance, got {other:?}"),
        }
    }

    #[test]
    fn weak_points_beyond_top_k_are_ignored() {
        let mut points = rectangle_outline(100, 100, 300, 300, 10);
        // A faint speck far outside the rectangle would otherwise become the
        // bottom-right corner.
        points.push(edge(390, 390, 41.0));
        let limited = QuadrilateralEstimator {
            top_k_points: points.len() - 1,
            ..estimator()
        };
        let quad = limited.estimate(&points).unwrap();
        assert_eq!(quad.bottom_right, Point::new(300, 300));

        let unlimited = estimator().estimate(&points).unwrap();
        assert_eq!(unlimited.bottom_right, Point::new(390, 390));
    }

    #[test]
    fn ties_go_to_first_point() {
        // (0,10) and (10,0) both score -10 for the top-left direction.
        let mut points = vec![edge(0, 10, 100.0), edge(10, 0, 100.0)];
        points.extend(rectangle_outline(50, 50, 250, 250, 10));
        let quad = estimator().estimate(&points).unwrap();
        assert_eq!(quad.top_left, Point::new(0, 10));
    }

    #[test]
    fn input_order_is_not_mutated() {
        let points = rectangle_outline(0, 0, 200, 150, 10);
        let before = points.clone();
        estimator().estimate(&points).unwrap();
        assert_eq!(points, before);
    }
}
