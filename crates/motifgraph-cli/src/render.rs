//! Text and JSON rendering of a motif report.

use colored::Colorize;
use serde::Serialize;

use motifgraph_engine::{
    AdjacencyView, Motif, MotifKind, MotifReport, MultiGraph, ResolutionStats, VertexId,
};

#[derive(Debug, Serialize)]
pub struct MotifRow {
    #[serde(rename = "type")]
    pub kind: MotifKind,
    /// Fan head or D-connector anchors.
    pub roles: Vec<String>,
    /// Leaves, spans or clique members.
    pub consumed: Vec<String>,
    pub scale: f64,
    pub attributes: String,
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub motifs: Vec<MotifRow>,
    pub stats: ResolutionStats,
}

pub fn json_report(graph: &MultiGraph, report: &MotifReport) -> JsonReport {
    JsonReport {
        motifs: report.motifs.iter().map(|m| row(graph, m)).collect(),
        stats: report.stats,
    }
}

pub fn text_report(graph: &MultiGraph, report: &MotifReport) -> Vec<String> {
    report
        .motifs
        .iter()
        .map(|m| {
            let row = row(graph, m);
            let shape = match m.kind() {
                MotifKind::Fan => format!("{} <{}>", row.roles.join(","), row.consumed.join(",")),
                MotifKind::DConnector => {
                    format!("({}) <{}>", row.roles.join(","), row.consumed.join(","))
                }
                MotifKind::Clique => format!("{{{}}}", row.consumed.join(",")),
            };
            format!(
                "{} {}  scale={}  {}",
                format!("{:<12}", row.kind.as_str()).cyan().bold(),
                shape,
                row.scale,
                row.attributes.dimmed()
            )
        })
        .collect()
}

fn row(graph: &MultiGraph, motif: &Motif) -> MotifRow {
    MotifRow {
        kind: motif.kind(),
        roles: labels(graph, motif.role_vertices()),
        consumed: labels(graph, motif.vertices_in_motif()),
        scale: motif.scale(),
        attributes: motif.collapsed_attributes(graph).encode(),
    }
}

fn labels(graph: &MultiGraph, ids: &[VertexId]) -> Vec<String> {
    ids.iter()
        .map(|&v| {
            graph
                .vertex_name(v)
                .map(str::to_string)
                .unwrap_or_else(|| v.to_string())
        })
        .collect()
}
