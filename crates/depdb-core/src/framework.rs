//! One framework (module): its targets and what they depend on.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// A framework's build targets, their dependencies and the extra framework
/// dependencies declared outside the build graph.
///
/// Dependency names may refer to targets of other frameworks or to targets no
/// framework owns (external dependencies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Framework {
    pub tier: String,
    pub name: String,
    targets: BTreeSet<String>,
    target_dependencies: BTreeMap<String, BTreeSet<String>>,
    extra_frameworks: BTreeSet<String>,
}

impl Framework {
    #[must_use]
    pub fn new(tier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tier: tier.into(),
            name: name.into(),
            targets: BTreeSet::new(),
            target_dependencies: BTreeMap::new(),
            extra_frameworks: BTreeSet::new(),
        }
    }

    pub fn add_target(&mut self, target: impl Into<String>) {
        self.targets.insert(target.into());
    }

    /// Record that `target` depends on `dep`. `target` becomes owned by this
    /// framework if it was not already.
    pub fn add_target_dependency(&mut self, target: impl Into<String>, dep: impl Into<String>) {
        let target = target.into();
        self.targets.insert(target.clone());
        self.target_dependencies
            .entry(target)
            .or_default()
            .insert(dep.into());
    }

    pub fn add_extra_framework(&mut self, name: impl Into<String>) {
        self.extra_frameworks.insert(name.into());
    }

    #[must_use]
    pub const fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    #[must_use]
    pub fn has_target(&self, target: &str) -> bool {
        self.targets.contains(target)
    }

    /// Direct dependencies of one target; empty for unknown targets.
    pub fn target_dependencies<'a>(
        &'a self,
        target: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.target_dependencies
            .get(target)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Union of the dependencies of every target.
    #[must_use]
    pub fn all_target_dependencies(&self) -> BTreeSet<&str> {
        self.target_dependencies
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub const fn extra_frameworks(&self) -> &BTreeSet<String> {
        &self.extra_frameworks
    }
}
