use tracing::debug;

use crate::graph::{NeighborIndex, VertexId};
use crate::motif::FanMotif;
use crate::progress::{Cancelled, Checkpoint};

/// Every vertex with at least two pendant neighbors heads one fan.
///
/// A leaf's only neighbor must be the head; a self-loop on a would-be leaf
/// gives it a second neighbor and disqualifies it.
pub fn detect_fans(
    index: &NeighborIndex,
    checkpoint: &Checkpoint<'_>,
) -> Result<Vec<FanMotif>, Cancelled> {
    let total = index.vertex_count();
    let mut fans = Vec::new();

    for (i, &head) in index.vertices().iter().enumerate() {
        checkpoint.tick(i, total)?;

        let neighbors = index.neighbors(head);
        if neighbors.len() < 2 {
            continue;
        }

        let leaves: Vec<VertexId> = neighbors
            .iter()
            .map(VertexId::new)
            .filter(|&leaf| index.is_pendant_of(leaf, head))
            .collect();

        if leaves.len() >= 2 {
            fans.push(FanMotif::new(head, leaves));
        }
    }

    checkpoint.finish(total);
    debug!(candidates = fans.len(), "fan detection finished");
    Ok(fans)
}
