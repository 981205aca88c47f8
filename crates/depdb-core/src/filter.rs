//! The "wanted" predicate applied to graph nodes before they become targets
//! or dependencies.

use glob::{MatchOptions, Pattern};
use tracing::trace;

use crate::config::DepDbConfig;
use crate::error::{Error, Result};
use crate::shape::Shape;

/// Case-sensitive, whole-name matching. `*` also matches `/` so `/*` covers
/// every absolute path.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled blacklist plus the Qt exclusion switch.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    blacklist: Vec<Pattern>,
    qt_prefix: String,
    with_qt: bool,
}

impl NodeFilter {
    /// Compile the blacklist from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for an entry that is not a valid glob.
    pub fn from_config(config: &DepDbConfig) -> Result<Self> {
        let blacklist = config
            .blacklist
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| Error::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            blacklist,
            qt_prefix: config.qt_prefix.clone(),
            with_qt: config.with_qt,
        })
    }

    /// True if `name` passes the blacklist and the Qt exclusion.
    #[must_use]
    pub fn accepts_name(&self, name: &str) -> bool {
        if let Some(p) = self
            .blacklist
            .iter()
            .find(|p| p.matches_with(name, MATCH_OPTIONS))
        {
            trace!(name, pattern = p.as_str(), "blacklisted");
            return false;
        }
        if !self.with_qt && name.starts_with(&self.qt_prefix) {
            trace!(name, "Qt dependency excluded");
            return false;
        }
        true
    }

    /// True if a node with this name and shape belongs in a framework model.
    #[must_use]
    pub fn wants(&self, name: &str, shape: &Shape) -> bool {
        shape.is_recognized() && self.accepts_name(name)
    }
}
