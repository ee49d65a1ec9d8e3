// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo capture: crop a full-resolution frame to the stored boundary and
// encode it as JPEG.

use std::path::Path;

use chrono::{DateTime, Utc};
use docbound_core::error::{DocboundError, Result};
use docbound_core::{CropRectangle, Detection, DetectionConfig};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, imageops};
use serde::Serialize;
use tracing::{info, instrument};

use crate::crop::CropAreaCalculator;
use crate::frame::Raster;
use crate::state::DetectionState;

/// An encoded photo and how it was framed.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedPhoto {
    #[serde(skip)]
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Region of the source frame kept, or `None` for the full frame.
    pub crop: Option<CropRectangle>,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn is_cropped(&self) -> bool {
        self.crop.is_some()
    }

    /// Write the JPEG bytes to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.jpeg)?;
        info!(path = %path.as_ref().display(), bytes = self.jpeg.len(), "Photo saved");
        Ok(())
    }
}

/// Turns full-resolution frames into JPEG photos.
#[derive(Debug, Clone, Copy)]
pub struct PhotoCapture {
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// Crop to the detected boundary when one is available.
    pub auto_detect: bool,
}

impl Default for PhotoCapture {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            auto_detect: true,
        }
    }
}

impl PhotoCapture {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
            auto_detect: true,
        }
    }

    /// Capture `frame` using whatever boundary `state` holds right now.
    pub fn capture_with_state(&self, frame: &Raster, state: &DetectionState) -> Result<CapturedPhoto> {
        let boundary = state.boundary();
        self.capture(frame, boundary.as_ref())
    }

    /// Capture `frame`, cropped to `detection` when auto-detect is on.
    ///
    /// Corners are mapped from the detection raster into the frame's
    /// resolution first. An unavailable crop keeps the full frame.
    #[instrument(skip_all, fields(width = frame.width(), height = frame.height()))]
    pub fn capture(&self, frame: &Raster, detection: Option<&Detection>) -> Result<CapturedPhoto> {
        if frame.is_empty() {
            return Err(DocboundError::InvalidRaster("cannot capture an empty frame".into()));
        }

        let crop = detection.filter(|_| self.auto_detect).and_then(|d| {
            let quad = d.quad_for_frame(frame.width(), frame.height());
            CropAreaCalculator::crop_area(&quad, frame.width(), frame.height())
        });

        let rgb = match crop {
            Some(rect) => {
                let region = imageops::crop_imm(frame.as_image(), rect.x, rect.y, rect.width, rect.height)
                    .to_image();
                DynamicImage::ImageRgba8(region).to_rgb8()
            }
            None => DynamicImage::ImageRgba8(frame.as_image().clone()).to_rgb8(),
        };

        let mut jpeg = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| DocboundError::ImageError(format!("JPEG encoding failed: {err}")))?;

        info!(
            cropped = crop.is_some(),
            width = rgb.width(),
            height = rgb.height(),
            bytes = jpeg.len(),
            "Photo captured"
        );

        Ok(CapturedPhoto {
            jpeg,
            width: rgb.width(),
            height: rgb.height(),
            crop,
            captured_at: Utc::now(),
        })
    }
}
