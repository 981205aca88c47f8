//! `depdb reduce --root <framework>`: drop frameworks nothing uses.

use clap::Args;
use depdb_core::FrameworkDatabase;
use serde::Serialize;

use crate::cmd::frameworks::{FrameworkRow, rows, write_pretty, write_text};
use crate::output::{OutputMode, render_mode};

#[derive(Args, Debug)]
pub struct ReduceArgs {
    /// Framework that is always kept; everything else must be used by a kept framework.
    #[arg(long)]
    pub root: String,
}

#[derive(Debug, Serialize)]
struct Reduced {
    root: String,
    removed: usize,
    frameworks: Vec<FrameworkRow>,
}

pub fn run_reduce(
    args: &ReduceArgs,
    db: &mut FrameworkDatabase,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let removed = db.remove_unused_frameworks(&args.root)?;
    let reduced = Reduced {
        root: args.root.clone(),
        removed,
        frameworks: rows(db),
    };
    render_mode(
        mode,
        &reduced,
        |r, w| write_text(&r.frameworks, w),
        |r, w| {
            let heading = format!(
                "Frameworks needed by {} ({} kept, {} removed)",
                r.root,
                r.frameworks.len(),
                r.removed
            );
            write_pretty(&heading, &r.frameworks, w)
        },
    )
}
