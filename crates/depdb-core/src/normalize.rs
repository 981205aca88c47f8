//! Rewrites CMake dependency graphs so that several of them can be merged.
//!
//! # Overview
//!
//! CMake names graph nodes `node0`, `node1`, ... and puts the real target name
//! in the label:
//!
//! ```text
//! "node0" [ label="KF5DNSSD" shape="polygon"];
//! "node1" [ label="Qt5::Network" shape="ellipse"];
//! "node0" -> "node1"
//! ```
//!
//! Generated ids differ from file to file, so [`Normalizer::normalize`]
//! identifies every node by its label instead, after stripping the namespace
//! token (`KF5::`):
//!
//! ```text
//! "KF5DNSSD" [ label="KF5DNSSD" shape="polygon"];
//! "Qt5::Network" [ label="Qt5::Network" shape="ellipse"];
//! "KF5DNSSD" -> "Qt5::Network"
//! ```
//!
//! ## Link aliases
//!
//! CMake sometimes emits a node for a target's link alias next to the target
//! itself:
//!
//! ```text
//! "node9" [ label="KParts" shape="polygon"];
//! "node15" [ label="KF5::KParts" shape="ellipse"];
//! ```
//!
//! Once the namespace is stripped both are called `KParts`. The alias node is
//! dropped and edges pointing at it are redirected to the real target.

use std::collections::{HashMap, HashSet};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::config::DepDbConfig;
use crate::dot::{Attrs, DotEdge, DotGraph, DotNode};
use crate::error::{Error, Result};
use crate::shape::Shape;

/// A graph node during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Id assigned by the graph source. Equal to `label` once normalized.
    pub id: String,
    pub label: String,
    pub shape: Shape,
}

/// A graph with one node per distinct label and edges between labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedGraph {
    pub name: Option<String>,
    pub nodes: Vec<Node>,
    /// `(tail, head)` label pairs, without duplicates.
    pub edges: Vec<(String, String)>,
}

impl NormalizedGraph {
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Convert to a DOT graph whose node ids are the labels.
    #[must_use]
    pub fn to_dot_graph(&self) -> DotGraph {
        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                let mut attrs = Attrs::new();
                attrs.insert("label".to_string(), n.label.clone());
                attrs.insert("shape".to_string(), n.shape.to_string());
                DotNode {
                    id: n.label.clone(),
                    attrs,
                }
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|(tail, head)| DotEdge {
                tail: tail.clone(),
                head: head.clone(),
                attrs: Attrs::new(),
            })
            .collect();
        DotGraph {
            strict: false,
            directed: true,
            name: self.name.clone(),
            attrs: Attrs::new(),
            nodes,
            edges,
        }
    }

    #[must_use]
    pub fn to_dot(&self) -> String {
        self.to_dot_graph().to_dot()
    }
}

/// Label rewriting and alias elimination.
#[derive(Debug, Clone)]
pub struct Normalizer {
    namespace: String,
}

impl Normalizer {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &DepDbConfig) -> Self {
        Self::new(config.namespace.clone())
    }

    /// Remove every occurrence of the namespace token from a label.
    #[must_use]
    pub fn strip_namespace(&self, label: &str) -> String {
        if self.namespace.is_empty() {
            return label.to_string();
        }
        label.replace(&self.namespace, "")
    }

    #[must_use]
    pub fn normalize(&self, raw: &DotGraph) -> NormalizedGraph {
        let nodes: Vec<(Node, &str)> = raw
            .nodes
            .iter()
            .map(|n| {
                let node = Node {
                    id: n.id.clone(),
                    label: self.strip_namespace(n.label()),
                    shape: Shape::parse(n.shape().unwrap_or_default()),
                };
                (node, n.label())
            })
            .collect();

        let targets: HashSet<&str> = nodes
            .iter()
            .filter(|(n, _)| n.shape.is_target())
            .map(|(n, _)| n.label.as_str())
            .collect();

        let mut id_to_label: HashMap<&str, &str> = HashMap::with_capacity(nodes.len());
        let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
        let mut by_label: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());

        for (node, raw_label) in &nodes {
            id_to_label.insert(&node.id, &node.label);
            if self.is_alias(node, raw_label, &targets) {
                trace!(id = %node.id, label = %node.label, "dropping link alias");
                continue;
            }
            if let Some(&i) = by_label.get(node.label.as_str()) {
                // A later target definition wins over an earlier dependency one.
                if node.shape.is_target() && !out[i].shape.is_target() {
                    out[i].shape = node.shape.clone();
                }
                continue;
            }
            by_label.insert(&node.label, out.len());
            out.push(Node {
                id: node.label.clone(),
                label: node.label.clone(),
                shape: node.shape.clone(),
            });
        }

        let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(raw.edges.len());
        let mut edges = Vec::with_capacity(raw.edges.len());
        for edge in &raw.edges {
            let (Some(&tail), Some(&head)) = (
                id_to_label.get(edge.tail.as_str()),
                id_to_label.get(edge.head.as_str()),
            ) else {
                warn!(tail = %edge.tail, head = %edge.head, "skipping edge to undeclared node");
                continue;
            };
            if tail == head {
                trace!(label = tail, "dropping self edge");
                continue;
            }
            if seen.insert((tail, head)) {
                edges.push((tail.to_string(), head.to_string()));
            }
        }

        debug!(
            raw_nodes = raw.nodes.len(),
            nodes = out.len(),
            edges = edges.len(),
            "normalized graph"
        );
        NormalizedGraph {
            name: raw.name.as_ref().map(|n| self.strip_namespace(n)),
            nodes: out,
            edges,
        }
    }

    fn is_alias(&self, node: &Node, raw_label: &str, targets: &HashSet<&str>) -> bool {
        node.shape == Shape::Ellipse
            && targets.contains(node.label.as_str())
            && raw_label
                .strip_prefix(self.namespace.as_str())
                .is_some_and(|rest| rest == node.label)
    }
}

/// Write `graph` to `<dir>/<file name of source>`.
///
/// # Errors
///
/// Returns [`Error::ScratchCollision`] if the destination already exists,
/// [`Error::InvalidGraphPath`] if `source` has no file name and [`Error::Io`]
/// on write failure.
pub fn write_scratch(dir: &Path, source: &Path, graph: &NormalizedGraph) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| Error::InvalidGraphPath(source.to_path_buf()))?;
    let path = dir.join(file_name);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(Error::ScratchCollision(path));
        }
        Err(e) => return Err(Error::io(path, e)),
    };
    file.write_all(graph.to_dot().as_bytes())
        .map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(src: &str) -> NormalizedGraph {
        let raw: DotGraph = src.parse().expect("valid DOT");
        Normalizer::new("KF5::").normalize(&raw)
    }

    #[test]
    fn ids_are_replaced_by_labels() {
        let g = normalize(
            r#"digraph "GG" {
                "node0" [ label="KF5DNSSD" shape="polygon"];
                "node1" [ label="Qt5::Network" shape="ellipse"];
                "node0" -> "node1"
            }"#,
        );
        let labels: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(labels, ["KF5DNSSD", "Qt5::Network"]);
        assert_eq!(g.edges, [("KF5DNSSD".to_string(), "Qt5::Network".to_string())]);
    }

    #[test]
    fn namespace_is_stripped_from_labels() {
        let g = normalize(r#"digraph { n0 [label="KF5::Archive" shape="ellipse"]; }"#);
        assert_eq!(g.nodes[0].label, "Archive");
    }

    #[test]
    fn link_alias_collapses_into_target() {
        let g = normalize(
            r#"digraph {
                "node9" [ label="KParts" shape="polygon"];
                "node3" [ label="KTextEditor" shape="polygon"];
                "node15" [ label="KF5::KParts" shape="ellipse"];
                "node3" -> "node15"
            }"#,
        );
        let kparts: Vec<&Node> = g.nodes.iter().filter(|n| n.label == "KParts").collect();
        assert_eq!(kparts.len(), 1);
        assert_eq!(kparts[0].shape, Shape::Polygon);
        assert_eq!(g.edges, [("KTextEditor".to_string(), "KParts".to_string())]);
    }

    #[test]
    fn every_alias_is_removed() {
        let g = normalize(
            r#"digraph {
                a [ label="KParts" shape="polygon"];
                b [ label="KIO" shape="octagon"];
                c [ label="KF5::KParts" shape="ellipse"];
                d [ label="KF5::KIO" shape="ellipse"];
            }"#,
        );
        assert_eq!(g.nodes.len(), 2);
    }

    #[test]
    fn non_alias_ellipse_with_target_label_is_merged() {
        // No namespace, so not an alias; still one node per label.
        let g = normalize(
            r#"digraph {
                a [ label="Foo" shape="ellipse"];
                b [ label="Foo" shape="house"];
            }"#,
        );
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.nodes[0].shape, Shape::House);
    }

    #[test]
    fn edges_to_undeclared_nodes_are_skipped() {
        let mut raw: DotGraph = r#"digraph { a [ label="A" shape="polygon"]; b; a -> b; }"#
            .parse()
            .expect("valid DOT");
        raw.edges.push(DotEdge {
            tail: "a".into(),
            head: "ghost".into(),
            attrs: Attrs::new(),
        });
        let g = Normalizer::new("KF5::").normalize(&raw);
        assert_eq!(g.edges, [("A".to_string(), "b".to_string())]);
        assert!(g.node("ghost").is_none());
    }

    #[test]
    fn duplicate_edges_collapse() {
        let g = normalize(
            r#"digraph {
                a [ label="A" shape="polygon"];
                b [ label="KF5::B" shape="ellipse"];
                c [ label="B" shape="ellipse"];
                a -> b; a -> c;
            }"#,
        );
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn other_namespace_is_left_alone() {
        let raw: DotGraph = r#"digraph {
            a [ label="KParts" shape="polygon"];
            b [ label="KF6::KParts" shape="ellipse"];
        }"#
        .parse()
        .expect("valid DOT");
        let g = Normalizer::new("KF6::").normalize(&raw);
        assert_eq!(g.nodes.len(), 1);
        let g = Normalizer::new("KF5::").normalize(&raw);
        assert_eq!(g.nodes.len(), 2);
    }

    #[test]
    fn scratch_file_is_readable_dot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let g = normalize(r#"digraph { a [label="A" shape="polygon"]; a -> b }"#);
        let path = write_scratch(dir.path(), Path::new("tier1/a/a.dot"), &g).expect("write");
        assert_eq!(path, dir.path().join("a.dot"));

        let back = DotGraph::read(&path).expect("read back");
        assert_eq!(back.node("A").and_then(DotNode::shape), Some("polygon"));
        assert_eq!(back.edges[0].tail, "A");
        assert_eq!(back.edges[0].head, "b");
    }

    #[test]
    fn scratch_file_never_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let g = NormalizedGraph::default();
        write_scratch(dir.path(), Path::new("t/a/a.dot"), &g).expect("first write");
        let err = write_scratch(dir.path(), Path::new("u/a/a.dot"), &g).expect_err("collision");
        assert!(matches!(err, Error::ScratchCollision(p) if p.ends_with("a.dot")));
    }
}
