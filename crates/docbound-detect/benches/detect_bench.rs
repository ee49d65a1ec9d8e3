// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for boundary detection in the docbound-detect crate.
// Each pass must fit comfortably inside one 200 ms tick at camera resolution.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use docbound_core::{BoundaryStrategy, DetectionConfig};
use docbound_detect::boundary::GradientExtractor;
use docbound_detect::{BoundaryDetector, CropAreaCalculator, Raster};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A light document covering the middle of a dark frame.
fn document_frame(width: u32, height: u32) -> Raster {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([25, 25, 25, 255]));
    for y in height / 6..height * 5 / 6 {
        for x in width / 6..width * 5 / 6 {
            img.put_pixel(x, y, Rgba([235, 230, 220, 255]));
        }
    }
    Raster::from_image(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_gradient_extraction(c: &mut Criterion) {
    let raster = document_frame(1280, 720);
    let extractor = GradientExtractor::new(40.0, 5, 100);

    c.bench_function("gradient_extraction (1280x720)", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&raster))));
    });
}

fn bench_gradient_detection(c: &mut Criterion) {
    let raster = document_frame(1280, 720);
    let detector = BoundaryDetector::from_config(&DetectionConfig::default());

    c.bench_function("gradient_detection (1280x720)", |b| {
        b.iter(|| black_box(detector.detect(black_box(&raster))));
    });
}

/// The contour strategy runs Canny over every pixel, so it is benchmarked at
/// a reduced detection size.
fn bench_contour_detection(c: &mut Criterion) {
    let raster = document_frame(640, 360);
    let detector = BoundaryDetector::from_config(&DetectionConfig {
        strategy: BoundaryStrategy::Contour,
        ..DetectionConfig::default()
    });

    c.bench_function("contour_detection (640x360)", |b| {
        b.iter(|| black_box(detector.detect(black_box(&raster))));
    });
}

fn bench_detect_and_crop(c: &mut Criterion) {
    let raster = document_frame(1920, 1080);
    let detector = BoundaryDetector::from_config(&DetectionConfig::default());

    c.bench_function("detect_and_crop (1920x1080)", |b| {
        b.iter(|| {
            let crop = detector.detect(black_box(&raster)).ok().and_then(|d| {
                CropAreaCalculator::crop_area(&d.quad, raster.width(), raster.height())
            });
            black_box(crop);
        });
    });
}

criterion_group!(
    benches,
    bench_gradient_extraction,
    bench_gradient_detection,
    bench_contour_detection,
    bench_detect_and_crop
);
criterion_main!(benches);
