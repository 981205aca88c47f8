//! `depdb frameworks`: list the frameworks read from the graph files.

use std::io::{self, Write};

use clap::Args;
use depdb_core::{Framework, FrameworkDatabase};
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct FrameworksArgs {}

/// One listed framework.
#[derive(Debug, Serialize)]
pub struct FrameworkRow {
    pub tier: String,
    pub name: String,
    pub targets: usize,
    pub extra_frameworks: Vec<String>,
}

impl From<&Framework> for FrameworkRow {
    fn from(fw: &Framework) -> Self {
        Self {
            tier: fw.tier.clone(),
            name: fw.name.clone(),
            targets: fw.targets().len(),
            extra_frameworks: fw.extra_frameworks().iter().cloned().collect(),
        }
    }
}

pub fn rows(db: &FrameworkDatabase) -> Vec<FrameworkRow> {
    db.iter().map(FrameworkRow::from).collect()
}

/// Tab-separated rows: tier, name, target count.
pub fn write_text(rows: &[FrameworkRow], w: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        writeln!(w, "{}\t{}\t{}", row.tier, row.name, row.targets)?;
    }
    Ok(())
}

pub fn write_pretty(heading: &str, rows: &[FrameworkRow], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, heading)?;
    for row in rows {
        write!(w, "{:<8} {:<24} {:>3} targets", row.tier, row.name, row.targets)?;
        if !row.extra_frameworks.is_empty() {
            write!(w, "  (+ {})", row.extra_frameworks.join(", "))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn run_frameworks(
    _args: &FrameworksArgs,
    db: &FrameworkDatabase,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let rows = rows(db);
    render_mode(
        mode,
        rows.as_slice(),
        |rows, w| write_text(rows, w),
        |rows, w| write_pretty(&format!("Frameworks ({})", rows.len()), rows, w),
    )
}
