// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: wires a frame feed, the detection loop and photo capture
// together the way a camera screen uses them.
//
// Frames are pushed in as they arrive; the loop picks up whichever is latest
// on each tick. The auto-detect toggle starts and stops the loop and decides
// whether captures are cropped.

use std::sync::Arc;

use docbound_core::error::Result;
use docbound_core::{CropRectangle, Detection, DetectionConfig};
use docbound_detect::{
    CapturedPhoto, CropAreaCalculator, DetectionLoop, DetectionState, FrameSource,
    LatestFrameSource, PhotoCapture, Raster,
};
use tracing::info;

pub struct ScanSession {
    frames: Arc<LatestFrameSource>,
    detection_loop: DetectionLoop,
    capture: PhotoCapture,
}

impl ScanSession {
    /// A session with auto-detect off and no frames yet.
    pub fn new(config: &DetectionConfig) -> Result<Self> {
        let detection_loop = DetectionLoop::new(config, DetectionState::new())?;
        let capture = PhotoCapture {
            auto_detect: false,
            ..PhotoCapture::from_config(config)
        };
        info!(strategy = ?config.strategy, "Scan session ready");
        Ok(Self {
            frames: Arc::new(LatestFrameSource::new()),
            detection_loop,
            capture,
        })
    }

    pub fn push_frame(&self, frame: Raster) {
        self.frames.push(frame);
    }

    pub fn auto_detect(&self) -> bool {
        self.capture.auto_detect
    }

    /// Turn boundary detection on or off. Turning it off clears the boundary.
    pub async fn set_auto_detect(&mut self, enabled: bool) -> Result<()> {
        self.capture.auto_detect = enabled;
        if enabled {
            let source: Arc<dyn FrameSource> = self.frames.clone();
            self.detection_loop.enable(source);
            Ok(())
        } else {
            self.detection_loop.disable().await
        }
    }

    pub fn boundary(&self) -> Option<Detection> {
        self.detection_loop.state().boundary()
    }

    /// Crop the next capture would use, in latest-frame coordinates.
    pub fn crop_area(&self) -> Option<CropRectangle> {
        let detection = self.boundary()?;
        let (width, height) = self.frames.dimensions();
        let quad = detection.quad_for_frame(width, height);
        CropAreaCalculator::crop_area(&quad, width, height)
    }

    /// Capture the latest frame.
    pub fn capture(&self) -> Result<CapturedPhoto> {
        let frame = self.frames.current_frame()?;
        self.capture.capture_with_state(&frame, self.detection_loop.state())
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.detection_loop.stop().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::time::Duration;

    fn document() -> Raster {
        let mut img = RgbaImage::from_pixel(640, 480, Rgba([10, 10, 10, 255]));
        for y in 80..400 {
            for x in 100..540 {
                img.put_pixel(x, y, Rgba([250, 250, 250, 255]));
            }
        }
        Raster::from_image(img)
    }

    #[tokio::test(start_paused = true)]
    async fn auto_detect_crops_capture() {
        let mut session = ScanSession::new(&DetectionConfig::default()).unwrap();
        session.push_frame(document());
        session.set_auto_detect(true).await.unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;

        assert_eq!(
            session.crop_area(),
            Some(CropRectangle {
                x: 100,
                y: 80,
                width: 440,
                height: 320
            })
        );
        let photo = session.capture().unwrap();
        assert!(photo.is_cropped());
        assert_eq!((photo.width, photo.height), (440, 320));

        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn turning_auto_detect_off_restores_full_frame() {
        let mut session = ScanSession::new(&DetectionConfig::default()).unwrap();
        session.push_frame(document());
        session.set_auto_detect(true).await.unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(session.boundary().is_some());

        session.set_auto_detect(false).await.unwrap();
        assert!(!session.auto_detect());
        assert!(session.boundary().is_none());
        assert!(session.crop_area().is_none());

        let photo = session.capture().unwrap();
        assert!(!photo.is_cropped());
        assert_eq!((photo.width, photo.height), (640, 480));
    }

    #[tokio::test]
    async fn capture_without_frames_fails() {
        let session = ScanSession::new(&DetectionConfig::default()).unwrap();
        assert!(session.capture().is_err());
    }
}
