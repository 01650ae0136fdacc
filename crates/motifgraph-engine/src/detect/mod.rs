//! Shape detectors.
//!
//! Each detector walks a [`NeighborIndex`](crate::graph::NeighborIndex)
//! snapshot in ascending vertex order and emits candidates in that discovery
//! order. Candidates may overlap; the resolver settles conflicts.

mod clique;
mod dconnector;
mod fan;

pub use clique::detect_cliques;
pub use dconnector::detect_d_connectors;
pub use fan::detect_fans;
