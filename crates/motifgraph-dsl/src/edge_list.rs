//! Edge-list dialect
//!
//! ```text
//! # a fan around C
//! C-D
//! C-E
//! C-F
//! F-G
//! lonely        # isolated vertex
//! ```
//!
//! Vertex names are trimmed and may contain spaces but not `-` or `#`.
//! A vertex exists from its first mention on; declaration order is kept so
//! downstream stores assign handles deterministically.

use nom::{
    bytes::complete::take_while1,
    character::complete::char as pchar,
    combinator::{all_consuming, map, opt, verify},
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub type Name = String;

// ============================================================================
// AST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeDecl {
    pub source: Name,
    pub target: Name,
    /// 1-based source line, kept for diagnostics.
    pub line: usize,
}

impl EdgeDecl {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeListDocument {
    /// Every vertex, in first-mention order.
    pub vertices: Vec<Name>,
    /// Every edge as written (parallel edges and self-loops included).
    pub edges: Vec<EdgeDecl>,
}

impl EdgeListDocument {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryV1 {
    Vertex(Name),
    Edge(Name, Name),
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeListParseError {
    #[error("parse error on line {line}: {message}")]
    Line { line: usize, message: String },
}

pub fn parse_edge_list(text: &str) -> Result<EdgeListDocument, EdgeListParseError> {
    let mut doc = EdgeListDocument::default();
    let mut seen: HashSet<Name> = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let entry = parse_entry(line).map_err(|message| EdgeListParseError::Line {
            line: line_no,
            message,
        })?;

        match entry {
            EntryV1::Vertex(name) => {
                declare_vertex(&mut doc, &mut seen, &name);
            }
            EntryV1::Edge(source, target) => {
                declare_vertex(&mut doc, &mut seen, &source);
                declare_vertex(&mut doc, &mut seen, &target);
                doc.edges.push(EdgeDecl {
                    source,
                    target,
                    line: line_no,
                });
            }
        }
    }

    Ok(doc)
}

fn declare_vertex(doc: &mut EdgeListDocument, seen: &mut HashSet<Name>, name: &str) {
    if seen.insert(name.to_string()) {
        doc.vertices.push(name.to_string());
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map(|(before, _)| before).unwrap_or(line)
}

fn is_name_char(c: char) -> bool {
    c != '-' && c != '#'
}

fn parse_vertex_name(input: &str) -> IResult<&str, &str> {
    map(
        verify(take_while1(is_name_char), |s: &str| !s.trim().is_empty()),
        str::trim,
    )(input)
}

fn parse_entry(rest: &str) -> Result<EntryV1, String> {
    fn parser(input: &str) -> IResult<&str, EntryV1> {
        let (input, first) = parse_vertex_name(input)?;
        let (input, second) = opt(preceded(pchar('-'), parse_vertex_name))(input)?;
        let entry = match second {
            Some(second) => EntryV1::Edge(first.to_string(), second.to_string()),
            None => EntryV1::Vertex(first.to_string()),
        };
        Ok((input, entry))
    }

    all_consuming(parser)(rest.trim())
        .map(|(_, v)| v)
        .map_err(|_| format!("expected `<vertex>` or `<vertex>-<vertex>`, got `{rest}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_forms() {
        assert_eq!(parse_entry("a").unwrap(), EntryV1::Vertex("a".to_string()));
        assert_eq!(
            parse_entry(" New York - Boston ").unwrap(),
            EntryV1::Edge("New York".to_string(), "Boston".to_string())
        );
        assert!(parse_entry("a-").is_err());
        assert!(parse_entry("-b").is_err());
        assert!(parse_entry("a-b-c").is_err());
        assert!(parse_entry("a- -b").is_err());
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a-b # trailing"), "a-b ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("a-b"), "a-b");
    }
}
