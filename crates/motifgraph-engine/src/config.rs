//! Detection configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::MotifError;
use crate::motif::MotifFamilies;

/// Smallest anchor set a D-connector can have.
pub const MIN_ANCHORS_FLOOR: usize = 2;
/// Smallest span set a D-connector can have.
pub const MIN_SPAN_FLOOR: usize = 1;
/// Smallest clique reported.
pub const MIN_CLIQUE_FLOOR: usize = 4;

pub const DEFAULT_MAX_BOUND: usize = 9999;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Families and size bounds for one detection run.
///
/// Anchor bounds only apply to D-connectors; fans have no caller bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotifConfig {
    pub families: MotifFamilies,
    pub min_anchors: usize,
    pub max_anchors: usize,
    pub min_span: usize,
    pub max_span: usize,
    pub min_clique: usize,
    pub max_clique: usize,
    /// Accept an overlapping clique with its unclaimed members when enough remain.
    pub trim_overlapping_cliques: bool,
    /// Vertices (or candidates) between progress reports and cancellation checks.
    pub progress_interval: usize,
}

impl Default for MotifConfig {
    fn default() -> Self {
        Self {
            families: MotifFamilies::ALL,
            min_anchors: MIN_ANCHORS_FLOOR,
            max_anchors: DEFAULT_MAX_BOUND,
            min_span: 2,
            max_span: DEFAULT_MAX_BOUND,
            min_clique: MIN_CLIQUE_FLOOR,
            max_clique: DEFAULT_MAX_BOUND,
            trim_overlapping_cliques: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl MotifConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_families(mut self, families: impl Into<MotifFamilies>) -> Self {
        self.families = families.into();
        self
    }

    pub fn with_anchor_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_anchors = min;
        self.max_anchors = max;
        self
    }

    pub fn with_span_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_span = min;
        self.max_span = max;
        self
    }

    pub fn with_clique_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_clique = min;
        self.max_clique = max;
        self
    }

    /// Apply the four-integer bound tuple `(min_anchors, max_anchors, min_size, max_size)`.
    ///
    /// The size pair bounds clique membership; span bounds are left untouched.
    pub fn with_legacy_bounds(
        self,
        min_anchors: usize,
        max_anchors: usize,
        min_size: usize,
        max_size: usize,
    ) -> Self {
        self.with_anchor_bounds(min_anchors, max_anchors)
            .with_clique_bounds(min_size, max_size)
    }

    pub fn with_clique_trimming(mut self, enabled: bool) -> Self {
        self.trim_overlapping_cliques = enabled;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Reject bound pairs that admit no motif; never clamps.
    pub fn validate(&self) -> Result<(), MotifError> {
        check_bounds("anchor", self.min_anchors, self.max_anchors, MIN_ANCHORS_FLOOR)?;
        check_bounds("span", self.min_span, self.max_span, MIN_SPAN_FLOOR)?;
        check_bounds("clique", self.min_clique, self.max_clique, MIN_CLIQUE_FLOOR)?;
        if self.progress_interval == 0 {
            return Err(MotifError::InvalidProgressInterval);
        }
        Ok(())
    }

    /// Effective anchor-count range (never below two anchors).
    pub fn anchor_range(&self) -> RangeInclusive<usize> {
        self.min_anchors.max(MIN_ANCHORS_FLOOR)..=self.max_anchors
    }

    /// Effective span-count range (never below one span).
    pub fn span_range(&self) -> RangeInclusive<usize> {
        self.min_span.max(MIN_SPAN_FLOOR)..=self.max_span
    }

    /// Effective clique-size range (never below four members).
    pub fn clique_range(&self) -> RangeInclusive<usize> {
        self.min_clique.max(MIN_CLIQUE_FLOOR)..=self.max_clique
    }

    pub fn from_json_str(json: &str) -> Result<Self, MotifError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MotifError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, MotifError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_bounds(
    bound: &'static str,
    min: usize,
    max: usize,
    floor: usize,
) -> Result<(), MotifError> {
    if min > max {
        return Err(MotifError::InvalidBounds { bound, min, max });
    }
    if max < floor {
        return Err(MotifError::EmptyBounds { bound, max, floor });
    }
    Ok(())
}
