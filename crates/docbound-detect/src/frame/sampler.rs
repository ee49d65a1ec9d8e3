// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame sampling: pull the current frame out of a video source and bring it
// to the fixed size the detector runs at.

use std::sync::RwLock;

use docbound_core::error::{DocboundError, Result};
use image::imageops::{self, FilterType};
use tracing::{debug, trace};

use super::raster::Raster;

/// Anything that can hand out the frame currently on screen.
///
/// Device acquisition lives outside this crate; a camera binding implements
/// this trait and the detection loop polls it once per tick.
pub trait FrameSource: Send + Sync {
    /// Native resolution of the source (the "true" video size).
    fn dimensions(&self) -> (u32, u32);

    /// Snapshot the current frame.
    fn current_frame(&self) -> Result<Raster>;
}

/// A source that always returns the same frame.
#[derive(Debug, Clone)]
pub struct StillFrameSource {
    frame: Raster,
}

impl StillFrameSource {
    pub fn new(frame: Raster) -> Self {
        Self { frame }
    }
}

impl FrameSource for StillFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn current_frame(&self) -> Result<Raster> {
        Ok(self.frame.clone())
    }
}

/// A source fed by a camera callback: the callback pushes each new frame and
/// the detection loop reads whichever frame is latest.
#[derive(Debug, Default)]
pub struct LatestFrameSource {
    latest: RwLock<Option<Raster>>,
}

impl LatestFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest frame.
    pub fn push(&self, frame: Raster) {
        match self.latest.write() {
            Ok(mut slot) => *slot = Some(frame),
            Err(poisoned) => *poisoned.into_inner() = Some(frame),
        }
    }
}

impl FrameSource for LatestFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        self.latest
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().map(|f| (f.width(), f.height())))
            .unwrap_or((0, 0))
    }

    fn current_frame(&self) -> Result<Raster> {
        let slot = self
            .latest
            .read()
            .map_err(|_| DocboundError::FrameSource("frame lock poisoned".into()))?;
        slot.as_ref()
            .cloned()
            .ok_or_else(|| DocboundError::FrameSource("no frame received yet".into()))
    }
}

/// Draws frames from a source into a fixed-size detection raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSampler {
    /// Target `(width, height)`; `None` keeps the source resolution.
    size: Option<(u32, u32)>,
}

impl FrameSampler {
    pub fn new(size: Option<(u32, u32)>) -> Self {
        Self { size }
    }

    /// Grab the source's current frame, resized to the target size when one
    /// is configured and it differs from the frame's own size.
    pub fn sample(&self, source: &dyn FrameSource) -> Result<Raster> {
        let frame = source.current_frame()?;
        match self.size {
            Some((w, h)) if (w, h) != (frame.width(), frame.height()) && !frame.is_empty() => {
                debug!(
                    from_w = frame.width(),
                    from_h = frame.height(),
                    to_w = w,
                    to_h = h,
                    "Resampling frame for detection"
                );
                let resized = imageops::resize(frame.as_image(), w, h, FilterType::Triangle);
                Ok(Raster::from_image(resized))
            }
            _ => {
                trace!(width = frame.width(), height = frame.height(), "Frame sampled");
                Ok(frame)
            }
        }
    }
}
