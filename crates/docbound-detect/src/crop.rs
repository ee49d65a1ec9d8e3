// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop-area calculation: from a detected quadrilateral to an axis-aligned
// rectangle inside the video frame.

use docbound_core::{CropRectangle, Quadrilateral};
use tracing::debug;

/// Derives crop rectangles from detected quadrilaterals.
pub struct CropAreaCalculator;

impl CropAreaCalculator {
    /// Axis-aligned crop for `quad` inside a `video_width x video_height` frame.
    ///
    /// The origin is the top-left corner clamped to zero; width and height run
    /// to the top-right and bottom-left corners, clipped to the frame. Returns
    /// `None` when either side comes out empty, in which case the caller
    /// should keep the full frame. No rotation or perspective correction is
    /// applied, even for skewed quadrilaterals.
    pub fn crop_area(
        quad: &Quadrilateral,
        video_width: u32,
        video_height: u32,
    ) -> Option<CropRectangle> {
        let crop_x = i64::from(quad.top_left.x).max(0);
        let crop_y = i64::from(quad.top_left.y).max(0);

        let width = (i64::from(video_width) - crop_x)
            .min(i64::from(quad.top_right.x) - i64::from(quad.top_left.x));
        let height = (i64::from(video_height) - crop_y)
            .min(i64::from(quad.bottom_left.y) - i64::from(quad.top_left.y));

        if width <= 0 || height <= 0 {
            debug!(
                crop_x,
                crop_y,
                width,
                height,
                video_width,
                video_height,
                "Crop area unavailable"
            );
            return None;
        }

        // Positive width/height imply crop_x < video_width and crop_y <
        // video_height, so every field fits in u32.
        Some(CropRectangle {
            x: crop_x as u32,
            y: crop_y as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}
