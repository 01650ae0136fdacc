//! Motif data model: the three families, the family bitmask, and the
//! accessors shared by the resolver, normalizer and codec.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::attributes::CollapsedAttributes;
use crate::error::MotifError;
use crate::graph::{AdjacencyView, VertexId};

// ============================================================================
// Families
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Fan,
    DConnector,
    Clique,
}

impl MotifKind {
    /// Canonical family order (also the discovery order across families).
    pub const ALL: [MotifKind; 3] = [MotifKind::Fan, MotifKind::DConnector, MotifKind::Clique];

    pub fn as_str(self) -> &'static str {
        match self {
            MotifKind::Fan => "fan",
            MotifKind::DConnector => "d-connector",
            MotifKind::Clique => "clique",
        }
    }

    /// Value of the `Type` collapsed attribute.
    pub fn type_tag(self) -> &'static str {
        match self {
            MotifKind::Fan => "FanMotif",
            MotifKind::DConnector => "DConnectorMotif",
            MotifKind::Clique => "CliqueMotif",
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_tag() == tag)
    }

    const fn bit(self) -> u8 {
        match self {
            MotifKind::Fan => 1,
            MotifKind::DConnector => 2,
            MotifKind::Clique => 4,
        }
    }
}

impl fmt::Display for MotifKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotifKind {
    type Err = MotifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fan" | "fans" => Ok(MotifKind::Fan),
            "d-connector" | "dconnector" | "d_connector" | "d-connectors" | "dconnectors" => {
                Ok(MotifKind::DConnector)
            }
            "clique" | "cliques" => Ok(MotifKind::Clique),
            _ => Err(MotifError::UnknownFamily(s.trim().to_string())),
        }
    }
}

/// Bitmask of requested motif families.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<MotifKind>", into = "Vec<MotifKind>")]
pub struct MotifFamilies(u8);

impl MotifFamilies {
    pub const NONE: Self = Self(0);
    pub const FAN: Self = Self(MotifKind::Fan.bit());
    pub const D_CONNECTOR: Self = Self(MotifKind::DConnector.bit());
    pub const CLIQUE: Self = Self(MotifKind::Clique.bit());
    pub const ALL: Self = Self(7);

    /// Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, kind: MotifKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: MotifKind) {
        self.0 |= kind.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Requested families in canonical order.
    pub fn iter(self) -> impl Iterator<Item = MotifKind> {
        MotifKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for MotifFamilies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MotifFamilies")
            .field(&self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for MotifFamilies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(MotifKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl From<MotifKind> for MotifFamilies {
    fn from(kind: MotifKind) -> Self {
        Self(kind.bit())
    }
}

impl From<Vec<MotifKind>> for MotifFamilies {
    fn from(kinds: Vec<MotifKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<MotifFamilies> for Vec<MotifKind> {
    fn from(families: MotifFamilies) -> Self {
        families.iter().collect()
    }
}

impl FromIterator<MotifKind> for MotifFamilies {
    fn from_iter<I: IntoIterator<Item = MotifKind>>(iter: I) -> Self {
        let mut out = Self::NONE;
        for kind in iter {
            out.insert(kind);
        }
        out
    }
}

impl BitOr for MotifFamilies {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<MotifKind> for MotifFamilies {
    type Output = Self;

    fn bitor(self, rhs: MotifKind) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign for MotifFamilies {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Parses a comma list such as `fan,clique`; `all` selects every family.
impl FromStr for MotifFamilies {
    type Err = MotifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") {
                out |= Self::ALL;
            } else {
                out.insert(part.parse()?);
            }
        }
        Ok(out)
    }
}

// ============================================================================
// Motif Variants
// ============================================================================

/// A head vertex with at least two pendant leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanMotif {
    head: VertexId,
    leaves: Vec<VertexId>,
    arc_scale: f64,
}

impl FanMotif {
    pub(crate) fn new(head: VertexId, leaves: Vec<VertexId>) -> Self {
        Self {
            head,
            leaves,
            arc_scale: 1.0,
        }
    }

    pub fn head(&self) -> VertexId {
        self.head
    }

    pub fn leaves(&self) -> &[VertexId] {
        &self.leaves
    }

    pub fn arc_scale(&self) -> f64 {
        self.arc_scale
    }
}

/// D anchor vertices shared by every span vertex; spans touch nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DConnectorMotif {
    anchors: Vec<VertexId>,
    spans: Vec<VertexId>,
    span_scale: f64,
}

impl DConnectorMotif {
    pub(crate) fn new(anchors: Vec<VertexId>) -> Self {
        Self {
            anchors,
            spans: Vec::new(),
            span_scale: 1.0,
        }
    }

    pub(crate) fn push_span(&mut self, span: VertexId) {
        self.spans.push(span);
    }

    pub fn anchors(&self) -> &[VertexId] {
        &self.anchors
    }

    pub fn spans(&self) -> &[VertexId] {
        &self.spans
    }

    pub fn span_scale(&self) -> f64 {
        self.span_scale
    }
}

/// A fully connected vertex set of at least four members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliqueMotif {
    members: Vec<VertexId>,
    clique_scale: f64,
}

impl CliqueMotif {
    pub(crate) fn new(members: Vec<VertexId>) -> Self {
        Self {
            members,
            clique_scale: 1.0,
        }
    }

    /// Drop members contained in `claimed` (any subset of a clique is a clique).
    pub(crate) fn remove_claimed(&mut self, claimed: &RoaringBitmap) {
        self.members.retain(|m| !claimed.contains(m.raw()));
    }

    pub fn members(&self) -> &[VertexId] {
        &self.members
    }

    pub fn clique_scale(&self) -> f64 {
        self.clique_scale
    }
}

// ============================================================================
// Motif
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motif {
    Fan(FanMotif),
    DConnector(DConnectorMotif),
    Clique(CliqueMotif),
}

impl Motif {
    pub fn kind(&self) -> MotifKind {
        match self {
            Motif::Fan(_) => MotifKind::Fan,
            Motif::DConnector(_) => MotifKind::DConnector,
            Motif::Clique(_) => MotifKind::Clique,
        }
    }

    /// Vertices consumed for overlap purposes: leaves, spans or members.
    pub fn vertices_in_motif(&self) -> &[VertexId] {
        match self {
            Motif::Fan(m) => &m.leaves,
            Motif::DConnector(m) => &m.spans,
            Motif::Clique(m) => &m.members,
        }
    }

    /// Role vertices that stay outside the consumed set: the fan head or the anchors.
    pub fn role_vertices(&self) -> &[VertexId] {
        match self {
            Motif::Fan(m) => std::slice::from_ref(&m.head),
            Motif::DConnector(m) => &m.anchors,
            Motif::Clique(_) => &[],
        }
    }

    /// Role and consumed vertices, sorted and de-duplicated.
    pub fn all_vertices(&self) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self
            .role_vertices()
            .iter()
            .chain(self.vertices_in_motif())
            .copied()
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Size statistic used for scale normalization.
    pub fn size(&self) -> usize {
        self.vertices_in_motif().len()
    }

    pub fn scale(&self) -> f64 {
        match self {
            Motif::Fan(m) => m.arc_scale,
            Motif::DConnector(m) => m.span_scale,
            Motif::Clique(m) => m.clique_scale,
        }
    }

    pub(crate) fn set_scale(&mut self, scale: f64) {
        match self {
            Motif::Fan(m) => m.arc_scale = scale,
            Motif::DConnector(m) => m.span_scale = scale,
            Motif::Clique(m) => m.clique_scale = scale,
        }
    }

    pub(crate) fn consumed_bitmap(&self) -> RoaringBitmap {
        self.vertices_in_motif().iter().map(|v| v.raw()).collect()
    }

    pub fn as_fan(&self) -> Option<&FanMotif> {
        match self {
            Motif::Fan(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_d_connector(&self) -> Option<&DConnectorMotif> {
        match self {
            Motif::DConnector(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_clique(&self) -> Option<&CliqueMotif> {
        match self {
            Motif::Clique(m) => Some(m),
            _ => None,
        }
    }

    /// Encode this motif for storage outside the engine.
    pub fn collapsed_attributes<G: AdjacencyView + ?Sized>(&self, view: &G) -> CollapsedAttributes {
        CollapsedAttributes::from_motif(self, view)
    }
}

impl From<FanMotif> for Motif {
    fn from(m: FanMotif) -> Self {
        Motif::Fan(m)
    }
}

impl From<DConnectorMotif> for Motif {
    fn from(m: DConnectorMotif) -> Self {
        Motif::DConnector(m)
    }
}

impl From<CliqueMotif> for Motif {
    fn from(m: CliqueMotif) -> Self {
        Motif::Clique(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<VertexId> {
        raw.iter().copied().map(VertexId::new).collect()
    }

    #[test]
    fn test_families_parse_and_display() {
        let families: MotifFamilies = "fan, clique".parse().unwrap();
        assert!(families.contains(MotifKind::Fan));
        assert!(!families.contains(MotifKind::DConnector));
        assert_eq!(families.to_string(), "fan,clique");

        assert_eq!("all".parse::<MotifFamilies>().unwrap(), MotifFamilies::ALL);
        assert_eq!("".parse::<MotifFamilies>().unwrap(), MotifFamilies::NONE);
        assert!(matches!(
            "fan,star".parse::<MotifFamilies>(),
            Err(MotifError::UnknownFamily(name)) if name == "star"
        ));
    }

    #[test]
    fn test_families_bit_ops() {
        let families = MotifFamilies::FAN | MotifKind::Clique;
        assert_eq!(families.bits(), 5);
        assert_eq!(
            families.iter().collect::<Vec<_>>(),
            vec![MotifKind::Fan, MotifKind::Clique]
        );
        assert_eq!(MotifFamilies::from_bits(0xff), MotifFamilies::ALL);
    }

    #[test]
    fn test_families_serde_as_kind_list() {
        let json = serde_json::to_string(&MotifFamilies::D_CONNECTOR).unwrap();
        assert_eq!(json, r#"["d_connector"]"#);
        let back: MotifFamilies = serde_json::from_str(r#"["clique","fan"]"#).unwrap();
        assert_eq!(back, MotifFamilies::FAN | MotifFamilies::CLIQUE);
    }

    #[test]
    fn test_type_tags() {
        for kind in MotifKind::ALL {
            assert_eq!(MotifKind::from_type_tag(kind.type_tag()), Some(kind));
        }
        assert_eq!(MotifKind::from_type_tag("StarMotif"), None);
    }

    #[test]
    fn test_consumed_versus_role_vertices() {
        let fan = Motif::from(FanMotif::new(VertexId::new(0), ids(&[1, 2])));
        assert_eq!(fan.vertices_in_motif(), ids(&[1, 2]).as_slice());
        assert_eq!(fan.role_vertices(), ids(&[0]).as_slice());
        assert_eq!(fan.scale(), 1.0);

        let mut d = DConnectorMotif::new(ids(&[5, 6]));
        d.push_span(VertexId::new(3));
        d.push_span(VertexId::new(4));
        let d = Motif::from(d);
        assert_eq!(d.size(), 2);
        assert_eq!(d.all_vertices(), ids(&[3, 4, 5, 6]));

        let clique = Motif::from(CliqueMotif::new(ids(&[7, 8, 9, 10])));
        assert!(clique.role_vertices().is_empty());
        assert_eq!(clique.kind(), MotifKind::Clique);
    }

    #[test]
    fn test_motif_serializes_with_type_tag() {
        let fan = Motif::from(FanMotif::new(VertexId::new(2), ids(&[3, 4])));
        let json = serde_json::to_value(&fan).unwrap();
        assert_eq!(json["type"], "fan");
        assert_eq!(json["head"], 2);
        assert_eq!(json["leaves"], serde_json::json!([3, 4]));
    }
}
