//! Motifgraph: motif detection and scoring over general multigraphs
//!
//! Finds structural patterns that can be collapsed into single visual units:
//! 1. **Fans**: a head vertex with at least two pendant leaves
//! 2. **D-connectors**: D anchor vertices shared by span vertices that touch
//!    nothing but the anchors
//! 3. **Cliques**: fully connected sets of at least four vertices
//!
//! One [`detect_motifs`] call runs the whole pipeline:
//!
//! ```text
//! AdjacencyView → NeighborIndex → detectors (per family)
//!               → OverlapResolver (cross-family) → normalize_scales (per family)
//! ```
//!
//! Accepted motifs carry vertex handles only; encode them for storage with
//! [`Motif::collapsed_attributes`].
//!
//! ## Module Organization
//!
//! - `graph`: vertex handles, the adjacency view trait, the multigraph store
//! - `detect`: fan, D-connector and clique detectors
//! - `resolve`: cross-family overlap resolution
//! - `scale`: per-family min-max normalization
//! - `attributes`: collapsed-attribute codec

pub mod attributes;
pub mod config;
pub mod detect;
mod error;
pub mod graph;
pub mod motif;
pub mod progress;
pub mod resolve;
pub mod scale;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use attributes::{format_scale, CollapsedAttributes, FIELD_SEPARATOR, KEY_VALUE_SEPARATOR};
pub use config::MotifConfig;
pub use error::MotifError;
pub use graph::{AdjacencyView, MultiGraph, NeighborIndex, VertexId};
pub use motif::{CliqueMotif, DConnectorMotif, FanMotif, Motif, MotifFamilies, MotifKind};
pub use progress::{
    CancellationFlag, Cancelled, Checkpoint, DetectionObserver, DetectionStage, NoopObserver,
    TracingObserver,
};
pub use resolve::{
    CandidateState, FamilyStats, OverlapResolver, RejectionReason, Resolution, ResolutionStats,
};
pub use scale::{normalize_scales, normalized_scale};

// ============================================================================
// Results
// ============================================================================

/// Accepted motifs of one run, in discovery order (fans, D-connectors, cliques).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifReport {
    pub motifs: Vec<Motif>,
    pub stats: ResolutionStats,
}

impl MotifReport {
    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    pub fn of_kind(&self, kind: MotifKind) -> impl Iterator<Item = &Motif> {
        self.motifs.iter().filter(move |m| m.kind() == kind)
    }

    pub fn fans(&self) -> impl Iterator<Item = &FanMotif> {
        self.motifs.iter().filter_map(Motif::as_fan)
    }

    pub fn d_connectors(&self) -> impl Iterator<Item = &DConnectorMotif> {
        self.motifs.iter().filter_map(Motif::as_d_connector)
    }

    pub fn cliques(&self) -> impl Iterator<Item = &CliqueMotif> {
        self.motifs.iter().filter_map(Motif::as_clique)
    }

    /// Collapsed attributes for every motif, in report order.
    pub fn collapsed_attributes<G: AdjacencyView + ?Sized>(
        &self,
        view: &G,
    ) -> Vec<CollapsedAttributes> {
        self.motifs
            .iter()
            .map(|m| m.collapsed_attributes(view))
            .collect()
    }
}

/// Outcome of a detection run; cancellation is distinct from "nothing found".
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Completed(MotifReport),
    Cancelled,
}

impl Detection {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Detection::Cancelled)
    }

    pub fn report(&self) -> Option<&MotifReport> {
        match self {
            Detection::Completed(report) => Some(report),
            Detection::Cancelled => None,
        }
    }

    pub fn into_report(self) -> Option<MotifReport> {
        match self {
            Detection::Completed(report) => Some(report),
            Detection::Cancelled => None,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Detect, resolve and score the requested motif families over `graph`.
///
/// Returns `Err` only for invalid configuration. The observer (if any) gets
/// progress every `config.progress_interval` items and may cancel at those
/// points, yielding [`Detection::Cancelled`].
pub fn detect_motifs<G: AdjacencyView + ?Sized>(
    graph: &G,
    config: &MotifConfig,
    observer: Option<&dyn DetectionObserver>,
) -> Result<Detection, MotifError> {
    config.validate()?;
    let observer = observer.unwrap_or(&NoopObserver);
    let checkpoint = Checkpoint::new(DetectionStage::Indexing, observer, config.progress_interval);

    match run_pipeline(graph, config, &checkpoint) {
        Ok(report) => {
            info!(
                families = %config.families,
                fans = report.stats.fan.accepted,
                d_connectors = report.stats.d_connector.accepted,
                cliques = report.stats.clique.accepted + report.stats.clique.trimmed,
                "motif detection finished"
            );
            Ok(Detection::Completed(report))
        }
        Err(Cancelled) => Ok(Detection::Cancelled),
    }
}

fn run_pipeline<G: AdjacencyView + ?Sized>(
    graph: &G,
    config: &MotifConfig,
    checkpoint: &Checkpoint<'_>,
) -> Result<MotifReport, Cancelled> {
    let families = config.families;
    if families.is_empty() {
        debug!("no motif family requested");
        return Ok(MotifReport::default());
    }

    let index = NeighborIndex::build_with(graph, &checkpoint.for_stage(DetectionStage::Indexing))?;

    let mut resolver = OverlapResolver::new();
    if config.trim_overlapping_cliques {
        resolver = resolver.with_clique_trimming(*config.clique_range().start());
    }

    if families.contains(MotifKind::Fan) {
        let fans = detect::detect_fans(&index, &checkpoint.for_stage(DetectionStage::Fans))?;
        resolver.extend(fans);
    }
    if families.contains(MotifKind::DConnector) {
        let connectors = detect::detect_d_connectors(
            &index,
            config,
            &checkpoint.for_stage(DetectionStage::DConnectors),
        )?;
        resolver.extend(connectors);
    }
    if families.contains(MotifKind::Clique) {
        let cliques =
            detect::detect_cliques(&index, config, &checkpoint.for_stage(DetectionStage::Cliques))?;
        resolver.extend(cliques);
    }

    let Resolution {
        mut accepted,
        stats,
    } = resolver.resolve(&checkpoint.for_stage(DetectionStage::Resolving))?;
    normalize_scales(&mut accepted);

    Ok(MotifReport {
        motifs: accepted,
        stats,
    })
}
