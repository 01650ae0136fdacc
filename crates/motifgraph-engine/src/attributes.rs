//! Collapsed-attribute codec.
//!
//! A motif is flattened into ordered `key=value` pairs joined by
//! [`FIELD_SEPARATOR`]:
//!
//! ```text
//! Type=FanMotif▓HeadVertexName=C▓LeafVertices=2▓ArcScale=1
//! ```
//!
//! Empty values are never written. Decoding yields the pairs only; it does
//! not rebuild a [`Motif`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::{AdjacencyView, VertexId};
use crate::motif::{Motif, MotifKind};

/// Separates `key=value` pairs (U+2593 DARK SHADE).
pub const FIELD_SEPARATOR: char = '\u{2593}';
/// Separates a key from its value; values may contain further `=`.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Attribute keys.
pub mod keys {
    pub const TYPE: &str = "Type";
    pub const HEAD_VERTEX_NAME: &str = "HeadVertexName";
    pub const LEAF_VERTICES: &str = "LeafVertices";
    pub const ARC_SCALE: &str = "ArcScale";
    pub const ANCHOR_VERTICES: &str = "AnchorVertices";
    pub const ANCHOR_VERTEX_NAME_PREFIX: &str = "AnchorVertexName";
    pub const SPAN_VERTICES: &str = "SpanVertices";
    pub const SPAN_SCALE: &str = "SpanScale";
    pub const MEMBER_VERTICES: &str = "MemberVertices";
    pub const CLIQUE_SCALE: &str = "CliqueScale";

    pub fn anchor_vertex_name(i: usize) -> String {
        format!("{ANCHOR_VERTEX_NAME_PREFIX}{i}")
    }
}

/// Ordered key/value pairs describing one collapsed motif.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedAttributes {
    pairs: Vec<(String, String)>,
}

impl CollapsedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_motif<G: AdjacencyView + ?Sized>(motif: &Motif, view: &G) -> Self {
        let mut attrs = Self::new();
        attrs.insert(keys::TYPE, motif.kind().type_tag());
        match motif {
            Motif::Fan(fan) => {
                attrs.insert_name(keys::HEAD_VERTEX_NAME, view, fan.head());
                attrs.insert(keys::LEAF_VERTICES, fan.leaves().len().to_string());
                attrs.insert(keys::ARC_SCALE, format_scale(fan.arc_scale()));
            }
            Motif::DConnector(d) => {
                attrs.insert(keys::ANCHOR_VERTICES, d.anchors().len().to_string());
                for (i, &anchor) in d.anchors().iter().enumerate() {
                    attrs.insert_name(&keys::anchor_vertex_name(i), view, anchor);
                }
                attrs.insert(keys::SPAN_VERTICES, d.spans().len().to_string());
                attrs.insert(keys::SPAN_SCALE, format_scale(d.span_scale()));
            }
            Motif::Clique(clique) => {
                attrs.insert(keys::MEMBER_VERTICES, clique.members().len().to_string());
                attrs.insert(keys::CLIQUE_SCALE, format_scale(clique.clique_scale()));
            }
        }
        attrs
    }

    /// Insert or replace `key`; empty values are ignored.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return;
        }
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Names that would not survive decoding are left out like missing ones.
    fn insert_name<G: AdjacencyView + ?Sized>(&mut self, key: &str, view: &G, v: VertexId) {
        if let Some(name) = view.vertex_name(v) {
            if !name.contains(FIELD_SEPARATOR) {
                self.insert(key, name);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key)?.parse().ok()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    /// Raw `Type` value (empty string when absent).
    pub fn type_tag(&self) -> &str {
        self.get(keys::TYPE).unwrap_or("")
    }

    pub fn group_type(&self) -> Option<MotifKind> {
        MotifKind::from_type_tag(self.type_tag())
    }

    /// Scale under the family's scale key.
    pub fn scale(&self) -> Option<f64> {
        let key = match self.group_type()? {
            MotifKind::Fan => keys::ARC_SCALE,
            MotifKind::DConnector => keys::SPAN_SCALE,
            MotifKind::Clique => keys::CLIQUE_SCALE,
        };
        self.get_f64(key)
    }

    /// One entry per anchor (`AnchorVertices` of them); `None` for unnamed anchors.
    pub fn anchor_vertex_names(&self) -> Vec<Option<&str>> {
        let count = self.get_usize(keys::ANCHOR_VERTICES).unwrap_or(0);
        (0..count)
            .map(|i| self.get(&keys::anchor_vertex_name(i)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse an encoded string. Pairs without a separator, with an empty key
    /// or with an empty value are skipped; a repeated key keeps its first
    /// position and its last value.
    pub fn decode(text: &str) -> Self {
        let mut attrs = Self::new();
        for field in text.split(FIELD_SEPARATOR) {
            if let Some((key, value)) = field.split_once(KEY_VALUE_SEPARATOR) {
                attrs.insert(key, value);
            }
        }
        attrs
    }
}

impl fmt::Display for CollapsedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, "{FIELD_SEPARATOR}")?;
            }
            write!(f, "{key}{KEY_VALUE_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}

/// Shortest round-tripping decimal; integral values have no fractional part.
pub fn format_scale(scale: f64) -> String {
    scale.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_formatting() {
        assert_eq!(format_scale(1.0), "1");
        assert_eq!(format_scale(0.0), "0");
        assert_eq!(format_scale(0.25), "0.25");
        assert_eq!(format_scale(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_insert_replaces_in_place_and_skips_empty() {
        let mut attrs = CollapsedAttributes::new();
        attrs.insert("A", "1");
        attrs.insert("B", "2");
        attrs.insert("A", "3");
        attrs.insert("C", "");
        assert_eq!(attrs.iter().collect::<Vec<_>>(), vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_decode_skips_malformed_pairs() {
        let text = format!("Type=CliqueMotif{FIELD_SEPARATOR}junk{FIELD_SEPARATOR}=x{FIELD_SEPARATOR}MemberVertices=4{FIELD_SEPARATOR}Note=a=b");
        let attrs = CollapsedAttributes::decode(&text);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.group_type(), Some(MotifKind::Clique));
        assert_eq!(attrs.get_usize(keys::MEMBER_VERTICES), Some(4));
        assert_eq!(attrs.get("Note"), Some("a=b"));
    }

    #[test]
    fn test_missing_type_is_empty() {
        let attrs = CollapsedAttributes::decode("");
        assert!(attrs.is_empty());
        assert_eq!(attrs.type_tag(), "");
        assert_eq!(attrs.group_type(), None);
        assert_eq!(attrs.scale(), None);
    }
}
