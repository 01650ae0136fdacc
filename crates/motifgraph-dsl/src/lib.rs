//! Motifgraph text formats
//!
//! This crate defines the plain-text graph format consumed by the motif
//! engine and the CLI, plus a typed document for it.
//!
//! The format is deliberately tiny: one edge (`a-b`) or one isolated vertex
//! (`a`) per line, `#` comments, blank lines ignored. Parallel edges and
//! self-loops (`a-a`) are kept as written; it is up to the graph store to
//! decide what they mean.

pub mod edge_list;

pub use edge_list::{parse_edge_list, EdgeDecl, EdgeListDocument, EdgeListParseError, Name};
