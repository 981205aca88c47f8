//! The framework database: every framework read from a set of graph files,
//! plus the queries that span frameworks.
//!
//! # Framework dependencies
//!
//! Framework `F` depends on framework `G` when
//!
//! - a target of `F` depends on a target owned by `G`, or
//! - `G`'s name is one of `F`'s extra frameworks.
//!
//! [`FrameworkDatabase::remove_unused_frameworks`] keeps the largest subset in
//! which every framework is the root or is depended on by another kept
//! framework. Everything the root reaches is kept, and so are dependency
//! cycles the root does not reach.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::DepDbConfig;
use crate::error::{Error, Result};
use crate::extras::apply_companion;
use crate::framework::Framework;
use crate::parser::FrameworkParser;

/// Frameworks in input order plus a target → framework index.
///
/// The index is private and rebuilt by every method that changes the
/// framework list, so lookups always see the current list.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FrameworkDatabase {
    frameworks: Vec<Framework>,
    #[serde(skip)]
    target_index: HashMap<String, usize>,
}

impl FrameworkDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_frameworks(frameworks: Vec<Framework>) -> Self {
        let mut db = Self {
            frameworks,
            target_index: HashMap::new(),
        };
        db.reindex();
        db
    }

    /// Read graph files with the default configuration, keeping or dropping
    /// Qt dependencies according to `include_qt`.
    ///
    /// # Errors
    ///
    /// See [`FrameworkDatabase::populate_with`].
    pub fn populate<P: AsRef<Path>>(&mut self, graph_sources: &[P], include_qt: bool) -> Result<()> {
        let config = DepDbConfig {
            with_qt: include_qt,
            ..DepDbConfig::default()
        };
        self.populate_with(&config, graph_sources)
    }

    /// Read graph files, each at `<tier>/<framework>/<framework>.dot`, and
    /// append one framework per file in the given order.
    ///
    /// Normalized graphs go to a scratch directory that is removed when this
    /// returns, on success or failure. On failure the database is left as it
    /// was.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read or parsed, on a scratch
    /// file collision (two sources with the same file name) and on a
    /// malformed companion file.
    #[instrument(skip_all, fields(sources = graph_sources.len(), with_qt = config.with_qt))]
    pub fn populate_with<P: AsRef<Path>>(
        &mut self,
        config: &DepDbConfig,
        graph_sources: &[P],
    ) -> Result<()> {
        let scratch = tempfile::Builder::new()
            .prefix("depdb")
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let parser = FrameworkParser::new(scratch.path(), config)?;

        let mut parsed = Vec::with_capacity(graph_sources.len());
        for source in graph_sources {
            let source = source.as_ref();
            let mut fw = parser.parse(source)?;
            apply_companion(&mut fw, source, config)?;
            parsed.push(fw);
        }

        self.frameworks.extend(parsed);
        self.reindex();
        info!(frameworks = self.frameworks.len(), "database populated");
        Ok(())
    }

    fn reindex(&mut self) {
        self.target_index.clear();
        for (i, fw) in self.frameworks.iter().enumerate() {
            for target in fw.targets() {
                self.target_index.insert(target.clone(), i);
            }
        }
    }

    /// First framework called `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Framework> {
        self.frameworks.iter().find(|fw| fw.name == name)
    }

    /// Dependency targets that no framework owns.
    #[must_use]
    pub fn find_external_targets(&self) -> BTreeSet<String> {
        let mut owned = BTreeSet::new();
        let mut all = BTreeSet::new();
        for fw in &self.frameworks {
            owned.extend(fw.targets().iter().map(String::as_str));
            all.extend(fw.all_target_dependencies());
        }
        all.difference(&owned).map(|s| (*s).to_string()).collect()
    }

    /// The framework owning `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTarget`] if no framework owns it.
    pub fn framework_for_target(&self, target: &str) -> Result<&Framework> {
        self.target_index
            .get(target)
            .map(|&i| &self.frameworks[i])
            .ok_or_else(|| Error::UnknownTarget(target.to_string()))
    }

    /// Names of the frameworks `name` depends on directly.
    ///
    /// Extra frameworks are listed even when the database does not contain
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFramework`] if there is no such framework.
    pub fn framework_dependencies(&self, name: &str) -> Result<BTreeSet<String>> {
        let fw = self
            .find_by_name(name)
            .ok_or_else(|| Error::UnknownFramework(name.to_string()))?;
        let mut deps: BTreeSet<String> = fw
            .all_target_dependencies()
            .into_iter()
            .filter_map(|t| self.framework_for_target(t).ok())
            .map(|owner| owner.name.clone())
            .collect();
        deps.extend(fw.extra_frameworks().iter().cloned());
        deps.remove(name);
        Ok(deps)
    }

    /// Framework-level "depends on" graph. Node `i` is `self.frameworks[i]`.
    fn dependency_graph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.frameworks.len(), 0);
        for fw in &self.frameworks {
            graph.add_node(fw.name.as_str());
        }

        let mut owners: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, fw) in self.frameworks.iter().enumerate() {
            for target in fw.targets() {
                owners.entry(target.as_str()).or_default().push(i);
            }
            by_name.entry(fw.name.as_str()).or_default().push(i);
        }

        for (i, fw) in self.frameworks.iter().enumerate() {
            let via_targets = fw
                .all_target_dependencies()
                .into_iter()
                .filter_map(|t| owners.get(t));
            let via_extras = fw
                .extra_frameworks()
                .iter()
                .filter_map(|n| by_name.get(n.as_str()));
            for &j in via_targets.chain(via_extras).flatten() {
                if i != j {
                    graph.update_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }
        graph
    }

    /// Drop frameworks until every remaining one is `wanted` or is depended
    /// on by another remaining one. Order is preserved.
    ///
    /// Returns the number of frameworks removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFramework`] if `wanted` is not in the database,
    /// in which case nothing is removed.
    #[instrument(skip(self))]
    pub fn remove_unused_frameworks(&mut self, wanted: &str) -> Result<usize> {
        let root = self
            .frameworks
            .iter()
            .position(|fw| fw.name == wanted)
            .ok_or_else(|| Error::UnknownFramework(wanted.to_string()))?;

        let mut used = vec![true; self.frameworks.len()];
        {
            // Peel frameworks nobody depends on; each removal may free its
            // own dependencies.
            let graph = self.dependency_graph();
            let mut dependents: Vec<usize> = graph
                .node_indices()
                .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
                .collect();
            let mut unused: Vec<NodeIndex> = graph
                .node_indices()
                .filter(|n| n.index() != root && dependents[n.index()] == 0)
                .collect();
            while let Some(node) = unused.pop() {
                used[node.index()] = false;
                for dep in graph.neighbors_directed(node, Direction::Outgoing) {
                    let count = &mut dependents[dep.index()];
                    *count -= 1;
                    if *count == 0 && dep.index() != root {
                        unused.push(dep);
                    }
                }
            }
        }

        let before = self.frameworks.len();
        self.frameworks = std::mem::take(&mut self.frameworks)
            .into_iter()
            .zip(used)
            .filter_map(|(fw, keep)| keep.then_some(fw))
            .collect();
        self.reindex();

        let removed = before - self.frameworks.len();
        info!(
            root = wanted,
            kept = self.frameworks.len(),
            removed,
            "removed unused frameworks"
        );
        Ok(removed)
    }

    #[must_use]
    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Framework> {
        self.frameworks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

impl<'a> IntoIterator for &'a FrameworkDatabase {
    type Item = &'a Framework;
    type IntoIter = std::slice::Iter<'a, Framework>;

    fn into_iter(self) -> Self::IntoIter {
        self.frameworks.iter()
    }
}
