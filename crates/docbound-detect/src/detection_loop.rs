// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Periodic detection loop.
//
// A single Tokio task ticks at the configured period. Each tick runs one
// synchronous pass: sample a frame, detect, publish. Missed ticks are skipped
// so passes never overlap. A pass that fails leaves the stored boundary as it
// was; nothing that happens inside a pass stops the loop.

use std::sync::Arc;
use std::time::Duration;

use docbound_core::DetectionConfig;
use docbound_core::error::{DocboundError, Result};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::boundary::BoundaryDetector;
use crate::frame::{FrameSampler, FrameSource};
use crate::state::DetectionState;

/// What a single pass needs, shared with the spawned task.
struct Pipeline {
    sampler: FrameSampler,
    detector: BoundaryDetector,
}

/// Started/stopped driver that keeps [`DetectionState`] current.
pub struct DetectionLoop {
    pipeline: Arc<Pipeline>,
    state: DetectionState,
    tick_period: Duration,
    /// Notification handle used to stop the task.
    shutdown_signal: Arc<Notify>,
    /// Handle to the running task, if any.
    task_handle: Option<JoinHandle<()>>,
}

impl DetectionLoop {
    /// Build a stopped loop from validated configuration.
    pub fn new(config: &DetectionConfig, state: DetectionState) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_detector(
            BoundaryDetector::from_config(config),
            FrameSampler::new(config.detection_size),
            config.tick_period(),
            state,
        ))
    }

    /// Build a stopped loop around an explicit detector.
    pub fn with_detector(
        detector: BoundaryDetector,
        sampler: FrameSampler,
        tick_period: Duration,
        state: DetectionState,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline { sampler, detector }),
            state,
            tick_period,
            shutdown_signal: Arc::new(Notify::new()),
            task_handle: None,
        }
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.is_some()
    }

    /// Enable detection and start ticking against `source`.
    pub fn enable(&mut self, source: Arc<dyn FrameSource>) {
        self.state.enable();
        self.start(source);
    }

    /// Disable detection: clear the boundary, invalidate the pass in flight
    /// and stop the task.
    pub async fn disable(&mut self) -> Result<()> {
        self.state.disable();
        self.stop().await
    }

    /// Spawn the ticking task. A no-op if it is already running.
    ///
    /// Passes run only while the state is enabled; ticks taken while it is
    /// disabled do nothing.
    pub fn start(&mut self, source: Arc<dyn FrameSource>) {
        if self.task_handle.is_some() {
            debug!("Detection loop already running");
            return;
        }

        let pipeline = Arc::clone(&self.pipeline);
        let state = self.state.clone();
        let shutdown = Arc::clone(&self.shutdown_signal);
        let period = self.tick_period;

        info!(period_ms = period.as_millis() as u64, "Starting detection loop");
        self.task_handle = Some(tokio::spawn(async move {
            Self::tick_loop(pipeline, state, source, shutdown, period).await;
        }));
    }

    /// Signal the task and wait for it to finish its current pass.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.task_handle.take() else {
            return Ok(());
        };

        self.shutdown_signal.notify_one();
        handle
            .await
            .map_err(|e| DocboundError::DetectionLoop(format!("task join: {e}")))?;

        info!("Detection loop stopped");
        Ok(())
    }

    async fn tick_loop(
        pipeline: Arc<Pipeline>,
        state: DetectionState,
        source: Arc<dyn FrameSource>,
        shutdown: Arc<Notify>,
        period: Duration,
    ) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    debug!("Detection loop received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    Self::run_pass(&pipeline, &state, source.as_ref());
                }
            }
        }
    }

    fn run_pass(pipeline: &Pipeline, state: &DetectionState, source: &dyn FrameSource) {
        let Some(generation) = state.begin_pass() else {
            trace!("Detection disabled; skipping tick");
            return;
        };

        let raster = match pipeline.sampler.sample(source) {
            Ok(raster) => raster,
            Err(e) => {
                warn!(error = %e, "Frame unavailable; skipping pass");
                return;
            }
        };

        match pipeline.detector.detect(&raster) {
            Ok(detection) => {
                if state.publish(generation, detection) {
                    trace!(generation, "Boundary updated");
                }
            }
            Err(failure) => debug!(%failure, "No boundary this pass"),
        }
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{LatestFrameSource, Raster, StillFrameSource};
    use image::{Rgba, RgbaImage};

    fn document() -> Raster {
        let mut img = RgbaImage::from_pixel(640, 480, Rgba([0, 0, 0, 255]));
        for y in 80..400 {
            for x in 100..540 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        Raster::from_image(img)
    }

    fn blank() -> Raster {
        Raster::from_image(RgbaImage::from_pixel(640, 480, Rgba([90, 90, 90, 255])))
    }

    fn new_loop() -> DetectionLoop {
        DetectionLoop::new(&DetectionConfig::default(), DetectionState::new()).unwrap()
    }

    async fn wait_ticks(n: u64) {
        tokio::time::sleep(Duration::from_millis(200 * n + 50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn enable_stores_boundary() {
        let mut detection_loop = new_loop();
        detection_loop.enable(Arc::new(StillFrameSource::new(document())));
        assert!(detection_loop.is_running());

        wait_ticks(2).await;
        let detection = detection_loop.state().boundary().expect("boundary stored");
        assert_eq!(detection.quad.extent(), (100, 80, 540, 400));

        detection_loop.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn disable_clears_boundary_and_stops() {
        let mut detection_loop = new_loop();
        detection_loop.enable(Arc::new(StillFrameSource::new(document())));
        wait_ticks(2).await;
        assert!(detection_loop.state().boundary().is_some());

        detection_loop.disable().await.unwrap();
        assert!(!detection_loop.is_running());
        assert!(detection_loop.state().boundary().is_none());

        wait_ticks(3).await;
        assert!(detection_loop.state().boundary().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_pass_keeps_previous_boundary() {
        let source = Arc::new(LatestFrameSource::new());
        source.push(document());

        let mut detection_loop = new_loop();
        detection_loop.enable(source.clone());
        wait_ticks(2).await;
        let before = detection_loop.state().boundary().expect("boundary stored");

        source.push(blank());
        wait_ticks(3).await;
        assert_eq!(detection_loop.state().boundary(), Some(before));

        detection_loop.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn missing_frames_do_not_stop_the_loop() {
        let source = Arc::new(LatestFrameSource::new());
        let mut detection_loop = new_loop();
        detection_loop.enable(source.clone());

        wait_ticks(3).await;
        assert!(detection_loop.state().boundary().is_none());

        source.push(document());
        wait_ticks(2).await;
        assert!(detection_loop.state().boundary().is_some());

        detection_loop.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_state_skips_passes() {
        let mut detection_loop = new_loop();
        detection_loop.start(Arc::new(StillFrameSource::new(document())));
        // Starting twice keeps the single task.
        detection_loop.start(Arc::new(StillFrameSource::new(document())));

        wait_ticks(3).await;
        assert!(detection_loop.state().boundary().is_none());

        detection_loop.state().enable();
        wait_ticks(2).await;
        assert!(detection_loop.state().boundary().is_some());

        detection_loop.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_start_is_ok() {
        let mut detection_loop = new_loop();
        assert!(detection_loop.stop().await.is_ok());
        assert!(!detection_loop.is_running());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = DetectionConfig {
            tick_period_ms: 0,
            ..DetectionConfig::default()
        };
        assert!(DetectionLoop::new(&config, DetectionState::new()).is_err());
    }
}
