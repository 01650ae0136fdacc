use ahash::AHashMap;
use tracing::{debug, trace};

use crate::config::MotifConfig;
use crate::graph::{NeighborIndex, VertexId};
use crate::motif::DConnectorMotif;
use crate::progress::{Cancelled, Checkpoint};

/// Group vertices by their exact loop-free neighbor set.
///
/// A vertex is a potential span under anchor set `A = N(s) \ {s}` when `|A|`
/// is within the anchor bounds and no anchor is a pendant (an anchor whose
/// only neighbor is `s` belongs to a fan, not a connector). Spans sharing the
/// same anchor set form one candidate, created when the set is first seen.
/// Candidates whose span count falls outside the span bounds are dropped.
pub fn detect_d_connectors(
    index: &NeighborIndex,
    config: &MotifConfig,
    checkpoint: &Checkpoint<'_>,
) -> Result<Vec<DConnectorMotif>, Cancelled> {
    let anchor_range = config.anchor_range();
    let span_range = config.span_range();
    let total = index.vertex_count();

    let mut candidates: Vec<DConnectorMotif> = Vec::new();
    let mut by_anchors: AHashMap<Vec<u32>, usize> = AHashMap::new();

    for (i, &span) in index.vertices().iter().enumerate() {
        checkpoint.tick(i, total)?;

        let anchors = index.loopless_neighbors(span);
        if !anchor_range.contains(&(anchors.len() as usize)) {
            continue;
        }
        if anchors
            .iter()
            .any(|a| index.distinct_degree(VertexId::new(a)) == 1)
        {
            continue;
        }

        let key: Vec<u32> = anchors.iter().collect();
        let slot = *by_anchors.entry(key).or_insert_with(|| {
            candidates.push(DConnectorMotif::new(
                anchors.iter().map(VertexId::new).collect(),
            ));
            candidates.len() - 1
        });
        candidates[slot].push_span(span);
    }

    let grouped = candidates.len();
    candidates.retain(|c| {
        let keep = span_range.contains(&c.spans().len());
        if !keep {
            trace!(anchors = ?c.anchors(), spans = c.spans().len(), "d-connector outside span bounds");
        }
        keep
    });

    checkpoint.finish(total);
    debug!(
        anchor_sets = grouped,
        candidates = candidates.len(),
        "d-connector detection finished"
    );
    Ok(candidates)
}
