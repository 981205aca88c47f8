//! Builds a [`Framework`] from one framework's dependency graph file.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, instrument};

use crate::config::DepDbConfig;
use crate::dot::{DotGraph, DotNode};
use crate::error::{Error, Result};
use crate::filter::NodeFilter;
use crate::framework::Framework;
use crate::normalize::{Normalizer, write_scratch};
use crate::shape::Shape;

/// Derive `(tier, framework)` from `<...>/<tier>/<framework>/<file>`.
///
/// # Errors
///
/// Returns [`Error::InvalidGraphPath`] when the path has fewer than three
/// components.
pub fn identity_from_path(path: &Path) -> Result<(String, String)> {
    let parts: Vec<_> = path.iter().collect();
    let [.., tier, name, _file] = parts.as_slice() else {
        return Err(Error::InvalidGraphPath(path.to_path_buf()));
    };
    Ok((
        tier.to_string_lossy().into_owned(),
        name.to_string_lossy().into_owned(),
    ))
}

/// Reads graph files into frameworks.
///
/// Every graph goes through the [`Normalizer`] and is written to the scratch
/// directory before it is read into a [`Framework`], so a scratch directory
/// must not be shared by two parsers at once.
#[derive(Debug)]
pub struct FrameworkParser<'a> {
    scratch_dir: &'a Path,
    target_prefix: String,
    normalizer: Normalizer,
    filter: NodeFilter,
}

impl<'a> FrameworkParser<'a> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the blacklist does not compile.
    pub fn new(scratch_dir: &'a Path, config: &DepDbConfig) -> Result<Self> {
        Ok(Self {
            scratch_dir,
            target_prefix: config.target_prefix.clone(),
            normalizer: Normalizer::from_config(config),
            filter: NodeFilter::from_config(config)?,
        })
    }

    /// Parse `dot_file`, located at `<tier>/<framework>/<framework>.dot`.
    ///
    /// # Errors
    ///
    /// Fails on an unusable path, unreadable or malformed DOT, or a scratch
    /// file collision.
    #[instrument(skip(self, dot_file), fields(path = %dot_file.display()))]
    pub fn parse(&self, dot_file: &Path) -> Result<Framework> {
        let (tier, name) = identity_from_path(dot_file)?;
        let raw = DotGraph::read(dot_file)?;
        let normalized = self.normalizer.normalize(&raw);
        let scratch = write_scratch(self.scratch_dir, dot_file, &normalized)?;
        let graph = DotGraph::read(&scratch)?;

        let mut fw = Framework::new(tier, name);
        self.ingest(&mut fw, &graph);
        debug!(
            framework = %fw.name,
            tier = %fw.tier,
            targets = fw.targets().len(),
            "parsed framework graph"
        );
        Ok(fw)
    }

    /// Add the wanted targets of a normalized graph, and their wanted
    /// dependencies, to `fw`.
    pub fn ingest(&self, fw: &mut Framework, graph: &DotGraph) {
        let by_id: HashMap<&str, &DotNode> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut targets = HashSet::new();
        for node in &graph.nodes {
            let shape = node_shape(node);
            if shape.is_target() && self.filter.wants(&node.id, &shape) {
                let target = self.target_name(&node.id);
                fw.add_target(target.clone());
                targets.insert(target);
            }
        }

        for edge in &graph.edges {
            let tail = self.target_name(&edge.tail);
            if !targets.contains(&tail) {
                continue;
            }
            let Some(head) = by_id.get(edge.head.as_str()) else {
                continue;
            };
            if self.filter.wants(&head.id, &node_shape(head)) {
                fw.add_target_dependency(tail, self.target_name(&head.id));
            }
        }
    }

    fn target_name(&self, name: &str) -> String {
        name.strip_prefix(self.target_prefix.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(name)
            .to_string()
    }
}

fn node_shape(node: &DotNode) -> Shape {
    Shape::parse(node.shape().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest(src: &str, with_qt: bool) -> Framework {
        let config = DepDbConfig {
            with_qt,
            ..DepDbConfig::default()
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let parser = FrameworkParser::new(dir.path(), &config).expect("parser");
        let raw: DotGraph = src.parse().expect("valid DOT");
        let graph = Normalizer::from_config(&config).normalize(&raw).to_dot_graph();
        let mut fw = Framework::new("tier1", "test");
        parser.ingest(&mut fw, &graph);
        fw
    }

    const DNSSD: &str = r#"digraph "GG" {
        "node0" [ label="KF5DNSSD" shape="polygon"];
        "node1" [ label="Qt5::Network" shape="ellipse"];
        "node0" -> "node1"
        "node2" [ label="KF5::CoreAddons" shape="ellipse"];
        "node0" -> "node2"
        "node3" [ label="pthread" shape="ellipse"];
        "node0" -> "node3"
        "node4" [ label="dnssd_test" shape="house"];
        "node4" -> "node0"
        "node5" [ label="-lavahi" shape="ellipse"];
        "node0" -> "node5"
        "node6" [ label="KF5::DNSSD" shape="ellipse"];
    }"#;

    #[test]
    fn targets_lose_the_framework_prefix() {
        let fw = ingest(DNSSD, false);
        assert_eq!(fw.targets().iter().collect::<Vec<_>>(), ["DNSSD"]);
    }

    #[test]
    fn unwanted_dependencies_are_skipped() {
        let fw = ingest(DNSSD, false);
        let deps: Vec<&str> = fw.target_dependencies("DNSSD").collect();
        assert_eq!(deps, ["CoreAddons"]);
    }

    #[test]
    fn qt_dependencies_are_kept_on_request() {
        let fw = ingest(DNSSD, true);
        let deps: Vec<&str> = fw.target_dependencies("DNSSD").collect();
        assert_eq!(deps, ["CoreAddons", "Qt5::Network"]);
    }

    #[test]
    fn blacklisted_targets_never_become_targets() {
        let fw = ingest(DNSSD, true);
        assert!(!fw.has_target("dnssd_test"));
        assert!(!fw.all_target_dependencies().contains("pthread"));
    }

    #[test]
    fn target_to_target_edges_are_recorded() {
        let fw = ingest(
            r#"digraph {
                a [label="KF5KIOCore" shape="polygon"];
                b [label="KF5KIOWidgets" shape="polygon"];
                c [label="kio_http" shape="octagon"];
                b -> a; c -> b;
            }"#,
            false,
        );
        assert_eq!(fw.targets().len(), 3);
        assert_eq!(fw.target_dependencies("KIOWidgets").collect::<Vec<_>>(), ["KIOCore"]);
        assert_eq!(fw.target_dependencies("kio_http").collect::<Vec<_>>(), ["KIOWidgets"]);
    }

    #[test]
    fn identity_comes_from_the_two_parent_directories() {
        let (tier, name) =
            identity_from_path(Path::new("/data/dot/tier2/kauth/kauth.dot")).expect("identity");
        assert_eq!(tier, "tier2");
        assert_eq!(name, "kauth");
    }

    #[test]
    fn short_paths_are_rejected() {
        let err = identity_from_path(Path::new("kauth/kauth.dot")).expect_err("too short");
        assert!(matches!(err, Error::InvalidGraphPath(_)));
    }

    #[test]
    fn parse_reads_file_and_writes_scratch() {
        let data = tempfile::tempdir().expect("tempdir");
        let scratch = tempfile::tempdir().expect("tempdir");
        let fw_dir = data.path().join("tier1").join("kdnssd");
        std::fs::create_dir_all(&fw_dir).expect("mkdir");
        let dot = fw_dir.join("kdnssd.dot");
        std::fs::write(&dot, DNSSD).expect("write");

        let config = DepDbConfig::default();
        let parser = FrameworkParser::new(scratch.path(), &config).expect("parser");
        let fw = parser.parse(&dot).expect("parse");
        assert_eq!(fw.tier, "tier1");
        assert_eq!(fw.name, "kdnssd");
        assert!(fw.has_target("DNSSD"));
        assert!(scratch.path().join("kdnssd.dot").exists());

        let err = parser.parse(&dot).expect_err("second parse collides");
        assert!(matches!(err, Error::ScratchCollision(_)));
    }
}
