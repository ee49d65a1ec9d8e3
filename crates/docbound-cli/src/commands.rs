// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use docbound_core::error::{DocboundError, Result};
use docbound_core::human_errors::humanize_failure;
use docbound_core::{CropRectangle, Detection, DetectionConfig};
use docbound_detect::{
    BoundaryDetector, CropAreaCalculator, FrameSampler, PhotoCapture, Raster, StillFrameSource,
};
use serde_json::json;
use tracing::{info, warn};

use crate::session::ScanSession;

/// File extensions `watch` treats as frames.
const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Load configuration from `path`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<DetectionConfig> {
    match path {
        Some(path) => {
            let config = DetectionConfig::from_json_file(path)?;
            info!(path = %path.display(), "Loaded detection config");
            Ok(config)
        }
        None => Ok(DetectionConfig::default()),
    }
}

fn open_frame(path: &Path) -> Result<Raster> {
    let image = image::open(path).map_err(|e| {
        DocboundError::ImageError(format!("failed to open {}: {e}", path.display()))
    })?;
    Ok(Raster::from_dynamic(&image))
}

fn crop_for(detection: &Detection, frame: &Raster) -> Option<CropRectangle> {
    let quad = detection.quad_for_frame(frame.width(), frame.height());
    CropAreaCalculator::crop_area(&quad, frame.width(), frame.height())
}

/// One detection pass over a still image.
///
/// Prints the detection and crop as JSON. With `output`, also writes the
/// photo: cropped when a boundary was found, otherwise the full frame.
pub fn detect(image: &Path, config: &DetectionConfig, output: Option<&Path>) -> Result<bool> {
    let frame = open_frame(image)?;
    let sampler = FrameSampler::new(config.detection_size);
    let raster = sampler.sample(&StillFrameSource::new(frame.clone()))?;
    let detector = BoundaryDetector::from_config(config);

    let (detection, found) = match detector.detect(&raster) {
        Ok(detection) => {
            let crop = crop_for(&detection, &frame);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "image": image.display().to_string(),
                    "frame": { "width": frame.width(), "height": frame.height() },
                    "detection": detection,
                    "crop": crop,
                }))?
            );
            (Some(detection), true)
        }
        Err(failure) => {
            let human = humanize_failure(&failure);
            eprintln!("{}\n  {}", human.message, human.suggestion);
            warn!(%failure, "No document boundary found");
            (None, false)
        }
    };

    if let Some(output) = output {
        let photo = PhotoCapture::from_config(config).capture(&frame, detection.as_ref())?;
        photo.save(output)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "photo": photo,
                "path": output.display().to_string(),
            }))?
        );
    }

    Ok(found)
}

/// Frame files in `dir`, in name order.
fn frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// How long each replayed frame stays current. Longer than one tick, so at
/// least one pass sees the frame before its line is reported.
fn frame_dwell(tick_period: Duration) -> Duration {
    tick_period + tick_period / 2
}

/// Push each frame into `session`, wait `dwell`, and report the boundary the
/// loop holds for it.
async fn replay(
    session: &mut ScanSession,
    files: &[PathBuf],
    dwell: Duration,
    mut report: impl FnMut(serde_json::Value),
) {
    for path in files {
        match open_frame(path) {
            Ok(frame) => session.push_frame(frame),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable frame");
                continue;
            }
        }
        tokio::time::sleep(dwell).await;

        report(json!({
            "frame": path.display().to_string(),
            "detection": session.boundary(),
            "crop": session.crop_area(),
        }));
    }
}

/// Replay a directory of frames through the live detection loop, printing
/// the boundary after each frame. With `output`, captures the
/// last frame at the end.
pub async fn watch(dir: &Path, config: &DetectionConfig, output: Option<&Path>) -> Result<bool> {
    let files = frame_files(dir)?;
    if files.is_empty() {
        return Err(DocboundError::FrameSource(format!(
            "no frames found in {}",
            dir.display()
        )));
    }
    info!(frames = files.len(), dir = %dir.display(), "Replaying frames");

    let mut session = ScanSession::new(config)?;
    session.set_auto_detect(true).await?;
    replay(&mut session, &files, frame_dwell(config.tick_period()), |line| {
        println!("{line}")
    })
    .await;

    let found = session.boundary().is_some();
    if let Some(output) = output {
        let photo = session.capture()?;
        photo.save(output)?;
    }
    session.shutdown().await?;
    Ok(found)
}

/// Write the effective configuration to `output`, or print it.
pub fn write_config(config: &DetectionConfig, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            config.save_json_file(path)?;
            info!(path = %path.display(), "Config written");
        }
        None => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}
