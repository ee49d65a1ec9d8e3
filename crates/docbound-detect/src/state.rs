// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared detection state: the latest boundary, the enabled flag and a
// generation counter that invalidates results from passes begun before a
// disable.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use docbound_core::Detection;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Inner {
    boundary: Option<Detection>,
    enabled: bool,
    generation: u64,
}

/// Cheaply cloneable handle to the shared detection state.
///
/// Mutated only by the detection loop (through [`publish`](Self::publish))
/// and by [`enable`](Self::enable) / [`disable`](Self::disable). Readers get
/// cloned snapshots.
#[derive(Debug, Clone, Default)]
pub struct DetectionState {
    inner: Arc<RwLock<Inner>>,
}

impl DetectionState {
    /// A disabled state with no boundary.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the latest stored boundary.
    pub fn boundary(&self) -> Option<Detection> {
        self.read().boundary.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.read().enabled
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Generation to tag a new pass with, or `None` while disabled.
    pub fn begin_pass(&self) -> Option<u64> {
        let inner = self.read();
        inner.enabled.then_some(inner.generation)
    }

    pub fn enable(&self) {
        let mut inner = self.write();
        if !inner.enabled {
            inner.enabled = true;
            info!(generation = inner.generation, "Boundary detection enabled");
        }
    }

    /// Clear the boundary and invalidate every pass still in flight.
    pub fn disable(&self) {
        let mut inner = self.write();
        inner.enabled = false;
        inner.boundary = None;
        inner.generation += 1;
        info!(generation = inner.generation, "Boundary detection disabled");
    }

    /// Store `detection` if the pass tagged `generation` is still current.
    ///
    /// Returns whether the detection was stored.
    pub fn publish(&self, generation: u64, detection: Detection) -> bool {
        let mut inner = self.write();
        if !inner.enabled || inner.generation != generation {
            debug!(
                pass_generation = generation,
                current_generation = inner.generation,
                enabled = inner.enabled,
                "Discarding stale detection"
            );
            return false;
        }
        inner.boundary = Some(detection);
        true
    }
}
