// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbound: Core geometry types, error taxonomy, and detection configuration
// shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{BoundaryStrategy, DetectionConfig};
pub use error::{DetectionFailure, DocboundError};
pub use types::*;
