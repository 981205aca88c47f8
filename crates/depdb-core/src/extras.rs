//! Companion files declaring framework dependencies the build graph does not
//! show.
//!
//! A graph `tier2/kio/kio.dot` may come with `tier2/kio/kio.yaml`:
//!
//! ```yaml
//! framework-dependencies:
//!   - kdbusaddons
//!   - kservice
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::DepDbConfig;
use crate::error::{Error, Result};
use crate::framework::Framework;

/// The companion file path for a graph file.
#[must_use]
pub fn companion_path(graph: &Path, extension: &str) -> PathBuf {
    graph.with_extension(extension)
}

/// Parse a companion document and return the names listed under `key`.
///
/// An empty document, a missing key or a null value yield no names.
///
/// # Errors
///
/// Returns the YAML error if the document is not a mapping or the value is
/// not a list of strings.
pub fn parse_extra_frameworks(text: &str, key: &str) -> Result<Vec<String>, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let Some(doc) = serde_yaml::from_str::<Option<serde_yaml::Mapping>>(text)? else {
        return Ok(Vec::new());
    };
    match doc.get(key) {
        Some(value) => {
            Ok(serde_yaml::from_value::<Option<Vec<String>>>(value.clone())?.unwrap_or_default())
        }
        None => Ok(Vec::new()),
    }
}

/// Merge the companion file of `graph`, if there is one, into `fw`.
///
/// Returns the number of names read.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file exists but cannot be read and
/// [`Error::Companion`] if it is malformed.
pub fn apply_companion(fw: &mut Framework, graph: &Path, config: &DepDbConfig) -> Result<usize> {
    let path = companion_path(graph, &config.companion_extension);
    if !path.exists() {
        return Ok(0);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let names = parse_extra_frameworks(&text, &config.companion_key)
        .map_err(|source| Error::Companion {
            path: path.clone(),
            source,
        })?;
    debug!(framework = %fw.name, path = %path.display(), count = names.len(), "extra framework dependencies");
    let count = names.len();
    for name in names {
        fw.add_extra_framework(name);
    }
    Ok(count)
}
