// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame input: raster snapshots and the sampler that produces them.

pub mod raster;
pub mod sampler;

pub use raster::Raster;
pub use sampler::{FrameSampler, FrameSource, LatestFrameSource, StillFrameSource};
