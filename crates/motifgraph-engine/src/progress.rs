//! Progress reporting and cooperative cancellation.
//!
//! Detection never blocks or yields; instead every stage calls back into a
//! [`DetectionObserver`] every `progress_interval` items, and checks the
//! observer's cancellation signal at the same points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pipeline stage reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStage {
    Indexing,
    Fans,
    DConnectors,
    Cliques,
    Resolving,
}

impl DetectionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionStage::Indexing => "indexing",
            DetectionStage::Fans => "fans",
            DetectionStage::DConnectors => "d-connectors",
            DetectionStage::Cliques => "cliques",
            DetectionStage::Resolving => "resolving",
        }
    }
}

impl fmt::Display for DetectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker returned by a stage that observed a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Progress/cancellation collaborator.
pub trait DetectionObserver {
    fn on_progress(&self, _stage: DetectionStage, _completed: usize, _total: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DetectionObserver for NoopObserver {}

/// Shared cancellation switch; clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl DetectionObserver for CancellationFlag {
    fn is_cancelled(&self) -> bool {
        self.is_set()
    }
}

/// Logs progress through `tracing` and honours an optional cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    cancel: Option<CancellationFlag>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationFlag) -> Self {
        Self {
            cancel: Some(cancel),
        }
    }
}

impl DetectionObserver for TracingObserver {
    fn on_progress(&self, stage: DetectionStage, completed: usize, total: usize) {
        tracing::debug!(%stage, completed, total, "motif detection progress");
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_set)
    }
}

// ============================================================================
// Checkpoints
// ============================================================================

static NOOP: NoopObserver = NoopObserver;

/// Per-stage reporting point handed to detectors.
#[derive(Clone, Copy)]
pub struct Checkpoint<'a> {
    stage: DetectionStage,
    observer: &'a dyn DetectionObserver,
    interval: usize,
}

impl<'a> Checkpoint<'a> {
    /// `interval` is clamped to at least 1.
    pub fn new(stage: DetectionStage, observer: &'a dyn DetectionObserver, interval: usize) -> Self {
        Self {
            stage,
            observer,
            interval: interval.max(1),
        }
    }

    /// A checkpoint that never reports and never cancels.
    pub fn silent(stage: DetectionStage) -> Checkpoint<'static> {
        Checkpoint {
            stage,
            observer: &NOOP,
            interval: usize::MAX,
        }
    }

    pub fn stage(&self) -> DetectionStage {
        self.stage
    }

    /// Same observer and interval, different stage.
    pub fn for_stage(&self, stage: DetectionStage) -> Self {
        Self { stage, ..*self }
    }

    /// Report `completed` of `total` and poll for cancellation on interval boundaries.
    pub fn tick(&self, completed: usize, total: usize) -> Result<(), Cancelled> {
        if completed % self.interval != 0 {
            return Ok(());
        }
        self.observer.on_progress(self.stage, completed, total);
        if self.observer.is_cancelled() {
            tracing::warn!(stage = %self.stage, completed, total, "motif detection cancelled");
            return Err(Cancelled);
        }
        Ok(())
    }

    /// Final report for a stage that ran to completion.
    pub fn finish(&self, total: usize) {
        self.observer.on_progress(self.stage, total, total);
    }
}

impl fmt::Debug for Checkpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("stage", &self.stage)
            .field("interval", &self.interval)
            .finish()
    }
}
