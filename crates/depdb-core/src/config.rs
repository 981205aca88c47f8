use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DEPDB_CONFIG";

/// Naming conventions and filters used when reading dependency graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepDbConfig {
    /// Namespace token stripped from node labels, also used to spot link
    /// aliases (`KF5::KParts` next to `KParts`).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Prefix stripped from target and dependency names (`KF5DNSSD` → `DNSSD`).
    #[serde(default = "default_target_prefix")]
    pub target_prefix: String,
    #[serde(default = "default_qt_prefix")]
    pub qt_prefix: String,
    /// Keep Qt dependencies in the model.
    #[serde(default)]
    pub with_qt: bool,
    /// Case-sensitive fnmatch patterns for names that never enter the model.
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<String>,
    #[serde(default = "default_companion_extension")]
    pub companion_extension: String,
    #[serde(default = "default_companion_key")]
    pub companion_key: String,
}

impl Default for DepDbConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            target_prefix: default_target_prefix(),
            qt_prefix: default_qt_prefix(),
            with_qt: false,
            blacklist: default_blacklist(),
            companion_extension: default_companion_extension(),
            companion_key: default_companion_key(),
        }
    }
}

impl DepDbConfig {
    /// Read a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `$DEPDB_CONFIG`, else `<config dir>/depdb/config.toml`, else the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn discover() -> Result<Self> {
        let candidate = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("depdb/config.toml")));
        match candidate {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

fn default_namespace() -> String {
    "KF5::".to_string()
}

fn default_target_prefix() -> String {
    "KF5".to_string()
}

fn default_qt_prefix() -> String {
    "Qt".to_string()
}

fn default_blacklist() -> Vec<String> {
    [
        // link flags
        "-l*", "-W*",
        // absolute dirs
        "/*",
        // generic libs
        "m", "pthread", "util", "nsl", "resolv",
        // helper targets
        "*example*", "*demo*", "*test*", "*Test*", "*debug*",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_companion_extension() -> String {
    "yaml".to_string()
}

fn default_companion_key() -> String {
    "framework-dependencies".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: DepDbConfig = toml::from_str("").expect("parse");
        assert_eq!(config, DepDbConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: DepDbConfig =
            toml::from_str("with_qt = true\nnamespace = \"KF6::\"\n").expect("parse");
        assert!(config.with_qt);
        assert_eq!(config.namespace, "KF6::");
        assert_eq!(config.target_prefix, "KF5");
        assert!(config.blacklist.iter().any(|p| p == "pthread"));
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "with_qt = \"maybe\"").expect("write");
        let err = DepDbConfig::load(&path).expect_err("bad type");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn load_reads_blacklist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "blacklist = [\"*Private*\"]").expect("write");
        let config = DepDbConfig::load(&path).expect("load");
        assert_eq!(config.blacklist, ["*Private*"]);
    }
}
