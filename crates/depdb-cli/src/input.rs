//! Graph file selection and database loading shared by every command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use depdb_core::{DepDbConfig, FrameworkDatabase};
use tracing::debug;

/// Where to read framework graphs from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Graph files, each at `<tier>/<framework>/<framework>.dot`.
    pub files: Vec<PathBuf>,

    /// Directory holding `<tier>/<framework>/<framework>.dot` files.
    #[arg(long, value_name = "DIR")]
    pub dot_dir: Option<PathBuf>,
}

impl InputArgs {
    /// Explicit files first, then discovered files in sorted order.
    pub fn graph_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = self.files.clone();
        if let Some(dir) = &self.dot_dir {
            files.extend(discover(dir)?);
        }
        if files.is_empty() {
            bail!("no graph files given; pass DOT files or --dot-dir");
        }
        Ok(files)
    }
}

/// Find `<dir>/<tier>/<framework>/*.dot`.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = dir
        .to_str()
        .with_context(|| format!("{} is not valid UTF-8", dir.display()))?;
    let pattern = format!("{}/*/*/*.dot", glob::Pattern::escape(root));
    let mut files = glob::glob(&pattern)
        .with_context(|| format!("invalid search pattern {pattern}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered graph files");
    Ok(files)
}

/// Build a database from the selected graph files.
pub fn load_database(input: &InputArgs, config: &DepDbConfig) -> Result<FrameworkDatabase> {
    let files = input.graph_files()?;
    let mut db = FrameworkDatabase::new();
    db.populate_with(config, &files)
        .context("failed to build the framework database")?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_finds_nested_dot_files_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (tier, name) in [("tier2", "kio"), ("tier1", "karchive"), ("tier1", "kcodecs")] {
            let fw_dir = dir.path().join(tier).join(name);
            std::fs::create_dir_all(&fw_dir).expect("mkdir");
            std::fs::write(fw_dir.join(format!("{name}.dot")), "digraph {}").expect("write");
            std::fs::write(fw_dir.join(format!("{name}.yaml")), "").expect("write");
        }
        std::fs::write(dir.path().join("stray.dot"), "digraph {}").expect("write");

        let files = discover(dir.path()).expect("discover");
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().expect("name").to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["karchive.dot", "kcodecs.dot", "kio.dot"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let input = InputArgs::default();
        assert!(input.graph_files().is_err());
    }
}
