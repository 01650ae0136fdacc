//! Graph adjacency: the read-only view the detectors run against, a
//! reference multigraph store implementing it, and the per-run neighbor
//! snapshot the detectors share.

use ahash::AHashMap;
use motifgraph_dsl::EdgeListDocument;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MotifError;
use crate::progress::{Cancelled, Checkpoint};

// ============================================================================
// Vertex Handles
// ============================================================================

/// Opaque vertex handle (stable for the lifetime of the source graph).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VertexId(u32);

impl VertexId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ============================================================================
// Adjacency View
// ============================================================================

/// Read-only undirected adjacency.
///
/// Implementations must be symmetric: `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`.
/// Parallel edges collapse into one neighbor entry; a self-loop makes a vertex
/// its own neighbor.
pub trait AdjacencyView {
    /// All vertex handles (iteration is ascending).
    fn vertices(&self) -> RoaringBitmap;

    /// Distinct neighbors of `v` (includes `v` itself iff it has a self-loop).
    fn neighbors(&self, v: VertexId) -> RoaringBitmap;

    fn is_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.neighbors(a).contains(b.raw())
    }

    /// Human-readable name, if the graph has one for `v`.
    fn vertex_name(&self, _v: VertexId) -> Option<&str> {
        None
    }
}

// ============================================================================
// Multigraph Store
// ============================================================================

/// Undirected multigraph with optional vertex names.
#[derive(Debug, Clone, Default)]
pub struct MultiGraph {
    names: Vec<Option<String>>,
    name_index: AHashMap<String, VertexId>,
    /// Distinct neighbor sets, indexed by vertex.
    adjacency: Vec<RoaringBitmap>,
    /// Edge multiplicity keyed by the ordered endpoint pair.
    multiplicity: AHashMap<(u32, u32), u32>,
    edge_count: usize,
}

impl MultiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a parsed edge list (vertices in first-mention order).
    pub fn from_edge_list(doc: &EdgeListDocument) -> Self {
        let mut graph = Self::new();
        for name in &doc.vertices {
            graph.intern_vertex(name);
        }
        for edge in &doc.edges {
            graph.add_named_edge(&edge.source, &edge.target);
        }
        graph
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, counting parallel edges and self-loops individually.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Add an unnamed vertex.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = VertexId::new(self.adjacency.len() as u32);
        self.adjacency.push(RoaringBitmap::new());
        self.names.push(None);
        id
    }

    /// Return the vertex named `name`, creating it on first sight.
    pub fn intern_vertex(&mut self, name: &str) -> VertexId {
        if let Some(&id) = self.name_index.get(name) {
            return id;
        }
        let id = self.add_vertex();
        self.names[id.index()] = Some(name.to_string());
        self.name_index.insert(name.to_string(), id);
        id
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.name_index.get(name).copied()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.index() < self.adjacency.len()
    }

    /// Add one edge between existing vertices (parallel edges and self-loops allowed).
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<(), MotifError> {
        for v in [a, b] {
            if !self.contains_vertex(v) {
                return Err(MotifError::UnknownVertex(v));
            }
        }
        self.link(a, b);
        Ok(())
    }

    /// Add an edge by endpoint names, creating vertices as needed.
    pub fn add_named_edge(&mut self, a: &str, b: &str) -> (VertexId, VertexId) {
        let a = self.intern_vertex(a);
        let b = self.intern_vertex(b);
        self.link(a, b);
        (a, b)
    }

    fn link(&mut self, a: VertexId, b: VertexId) {
        self.adjacency[a.index()].insert(b.raw());
        self.adjacency[b.index()].insert(a.raw());
        *self.multiplicity.entry(edge_key(a, b)).or_insert(0) += 1;
        self.edge_count += 1;
    }

    /// Number of parallel edges between `a` and `b` (0 when not adjacent).
    pub fn edge_multiplicity(&self, a: VertexId, b: VertexId) -> u32 {
        self.multiplicity.get(&edge_key(a, b)).copied().unwrap_or(0)
    }

    pub fn has_self_loop(&self, v: VertexId) -> bool {
        self.edge_multiplicity(v, v) > 0
    }
}

fn edge_key(a: VertexId, b: VertexId) -> (u32, u32) {
    if a <= b {
        (a.raw(), b.raw())
    } else {
        (b.raw(), a.raw())
    }
}

impl AdjacencyView for MultiGraph {
    fn vertices(&self) -> RoaringBitmap {
        let mut all = RoaringBitmap::new();
        all.insert_range(0..self.adjacency.len() as u32);
        all
    }

    fn neighbors(&self, v: VertexId) -> RoaringBitmap {
        self.adjacency.get(v.index()).cloned().unwrap_or_default()
    }

    fn is_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacency
            .get(a.index())
            .map(|n| n.contains(b.raw()))
            .unwrap_or(false)
    }

    fn vertex_name(&self, v: VertexId) -> Option<&str> {
        self.names.get(v.index()).and_then(|n| n.as_deref())
    }
}

// ============================================================================
// Neighbor Snapshot
// ============================================================================

/// Neighbor sets captured once per detection run.
///
/// Every detector reads from the same snapshot, so the source view is
/// queried exactly once per vertex.
#[derive(Debug, Clone, Default)]
pub struct NeighborIndex {
    vertices: Vec<VertexId>,
    sets: AHashMap<u32, RoaringBitmap>,
    empty: RoaringBitmap,
}

impl NeighborIndex {
    pub fn build<G: AdjacencyView + ?Sized>(view: &G) -> Self {
        match Self::build_with(view, &Checkpoint::silent(crate::DetectionStage::Indexing)) {
            Ok(index) => index,
            Err(Cancelled) => Self::default(),
        }
    }

    pub fn build_with<G: AdjacencyView + ?Sized>(
        view: &G,
        checkpoint: &Checkpoint<'_>,
    ) -> Result<Self, Cancelled> {
        let all = view.vertices();
        let total = all.len() as usize;
        let mut vertices = Vec::with_capacity(total);
        let mut sets = AHashMap::with_capacity(total);
        for (i, raw) in all.iter().enumerate() {
            checkpoint.tick(i, total)?;
            let v = VertexId::new(raw);
            vertices.push(v);
            sets.insert(raw, view.neighbors(v));
        }
        checkpoint.finish(total);
        Ok(Self {
            vertices,
            sets,
            empty: RoaringBitmap::new(),
        })
    }

    /// Vertices in ascending handle order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn neighbors(&self, v: VertexId) -> &RoaringBitmap {
        self.sets.get(&v.raw()).unwrap_or(&self.empty)
    }

    /// Distinct neighbor count, a self-loop counting as one neighbor.
    pub fn distinct_degree(&self, v: VertexId) -> u64 {
        self.neighbors(v).len()
    }

    /// Neighbors of `v` excluding `v` itself.
    pub fn loopless_neighbors(&self, v: VertexId) -> RoaringBitmap {
        let mut out = self.neighbors(v).clone();
        out.remove(v.raw());
        out
    }

    pub fn has_self_loop(&self, v: VertexId) -> bool {
        self.neighbors(v).contains(v.raw())
    }

    /// True when `leaf`'s only neighbor is `head`.
    pub fn is_pendant_of(&self, leaf: VertexId, head: VertexId) -> bool {
        let n = self.neighbors(leaf);
        leaf != head && n.len() == 1 && n.contains(head.raw())
    }
}
