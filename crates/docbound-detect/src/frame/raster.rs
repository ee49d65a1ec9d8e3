// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster: an immutable RGBA snapshot of one video frame.

use docbound_core::error::{DocboundError, Result};
use image::{DynamicImage, RgbaImage};

/// A single decoded frame: `width * height` RGBA pixels in row-major order.
///
/// A raster is created for one detection pass and dropped when the pass
/// completes; nothing in the pipeline retains it.
#[derive(Debug, Clone)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    /// Wrap a raw RGBA buffer. The buffer must hold exactly `4 * width * height`
    /// bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = 4 * width as usize * height as usize;
        if data.len() != expected {
            return Err(DocboundError::InvalidRaster(format!(
                "{width}x{height} RGBA needs {expected} bytes, got {}",
                data.len()
            )));
        }
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            DocboundError::InvalidRaster(format!("cannot build {width}x{height} buffer"))
        })?;
        Ok(Self { pixels })
    }

    /// Wrap an already-decoded RGBA image.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Convert any decoded image to an RGBA raster.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            pixels: image.to_rgba8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// True when the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    /// The contiguous RGBA byte buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Perceptual luminance of every pixel (`0.299R + 0.587G + 0.114B`),
    /// alpha discarded, row-major.
    pub fn luminance(&self) -> Vec<f32> {
        self.pixels
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let result = Raster::from_rgba(4, 4, vec![0u8; 4 * 4 * 3]);
        assert!(matches!(result, Err(DocboundError::InvalidRaster(_))));
    }

    #[test]
    fn accepts_exact_buffer() {
        let raster = Raster::from_rgba(3, 2, vec![7u8; 4 * 3 * 2]).unwrap();
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.as_bytes().len(), 24);
        assert!(!raster.is_empty());
    }

    #[test]
    fn luminance_uses_perceptual_weights_and_ignores_alpha() {
        let data = vec![
            255, 0, 0, 0, // red, transparent
            0, 255, 0, 255, // green
            0, 0, 255, 128, // blue
            255, 255, 255, 255, // white
        ];
        let raster = Raster::from_rgba(4, 1, data).unwrap();
        let luma = raster.luminance();
        assert!((luma[0] - 76.245).abs() < 1e-3);
        assert!((luma[1] - 149.685).abs() < 1e-3);
        assert!((luma[2] - 29.07).abs() < 1e-3);
        assert!((luma[3] - 255.0).abs() < 1e-3);
    }

    #[test]
    fn empty_raster_is_empty() {
        let raster = Raster::from_rgba(0, 0, Vec::new()).unwrap();
        assert!(raster.is_empty());
        assert!(raster.luminance().is_empty());
    }
}
