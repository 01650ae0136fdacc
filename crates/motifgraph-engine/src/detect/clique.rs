use ahash::AHashMap;
use roaring::RoaringBitmap;
use tracing::debug;

use crate::config::MotifConfig;
use crate::graph::{NeighborIndex, VertexId};
use crate::motif::CliqueMotif;
use crate::progress::{Cancelled, Checkpoint};

/// Maximal cliques whose size lies within the clique bounds.
///
/// Bron–Kerbosch with Tomita pivoting over loop-free neighbor bitmaps. Each
/// vertex `v` seeds the search for cliques whose smallest member is `v`, so
/// every maximal clique is reported exactly once. A maximal clique larger
/// than `max_clique` is skipped, not split.
pub fn detect_cliques(
    index: &NeighborIndex,
    config: &MotifConfig,
    checkpoint: &Checkpoint<'_>,
) -> Result<Vec<CliqueMotif>, Cancelled> {
    let range = config.clique_range();
    let (min, max) = (*range.start(), *range.end());

    let adjacency = core_adjacency(index, min);
    let total = adjacency.len();

    let mut seeds: Vec<u32> = adjacency.keys().copied().collect();
    seeds.sort_unstable();

    let mut found: Vec<Vec<u32>> = Vec::new();
    let mut earlier = RoaringBitmap::new();
    for (i, &v) in seeds.iter().enumerate() {
        checkpoint.tick(i, total)?;

        let Some(neighbors) = adjacency.get(&v) else {
            continue;
        };
        let p = neighbors - &earlier;
        let x = neighbors & &earlier;
        let mut search = Search {
            adjacency: &adjacency,
            min,
            max,
            clique: vec![v],
            found: &mut found,
        };
        search.expand(p, x);
        earlier.insert(v);
    }

    let mut cliques: Vec<CliqueMotif> = found
        .into_iter()
        .map(|mut members| {
            members.sort_unstable();
            CliqueMotif::new(members.into_iter().map(VertexId::new).collect())
        })
        .collect();
    cliques.sort_by(|a, b| a.members().cmp(b.members()));

    checkpoint.finish(total);
    debug!(
        core_vertices = total,
        candidates = cliques.len(),
        "clique detection finished"
    );
    Ok(cliques)
}

/// Loop-free adjacency restricted to the (min - 1)-core.
///
/// A vertex with fewer than `min - 1` neighbors inside the core cannot sit in
/// a clique of `min` members; peeling repeats until no vertex drops out.
fn core_adjacency(index: &NeighborIndex, min: usize) -> AHashMap<u32, RoaringBitmap> {
    let need = min.saturating_sub(1) as u64;
    let mut alive: RoaringBitmap = index.vertices().iter().map(|v| v.raw()).collect();

    loop {
        let doomed: Vec<u32> = alive
            .iter()
            .filter(|&v| {
                let n = index.loopless_neighbors(VertexId::new(v));
                n.intersection_len(&alive) < need
            })
            .collect();
        if doomed.is_empty() {
            break;
        }
        for v in doomed {
            alive.remove(v);
        }
    }

    alive
        .iter()
        .map(|v| (v, index.loopless_neighbors(VertexId::new(v)) & &alive))
        .collect()
}

struct Search<'a> {
    adjacency: &'a AHashMap<u32, RoaringBitmap>,
    min: usize,
    max: usize,
    clique: Vec<u32>,
    found: &'a mut Vec<Vec<u32>>,
}

impl<'a> Search<'a> {
    fn neighbors(&self, v: u32) -> Option<&'a RoaringBitmap> {
        self.adjacency.get(&v)
    }

    fn expand(&mut self, mut p: RoaringBitmap, mut x: RoaringBitmap) {
        if p.is_empty() {
            if x.is_empty() && (self.min..=self.max).contains(&self.clique.len()) {
                self.found.push(self.clique.clone());
            }
            return;
        }
        if self.clique.len() + (p.len() as usize) < self.min {
            return;
        }

        let pivot = p
            .iter()
            .chain(x.iter())
            .max_by_key(|&u| self.neighbors(u).map_or(0, |n| n.intersection_len(&p)));
        let mut branch = p.clone();
        if let Some(n) = pivot.and_then(|u| self.neighbors(u)) {
            branch -= n;
        }

        for v in branch.iter() {
            let Some(nv) = self.neighbors(v) else {
                continue;
            };
            self.clique.push(v);
            self.expand(&p & nv, &x & nv);
            self.clique.pop();
            p.remove(v);
            x.insert(v);
        }
    }
}
