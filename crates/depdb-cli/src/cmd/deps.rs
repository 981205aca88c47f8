//! `depdb deps <framework>`: frameworks one framework depends on directly.


use clap::Args;
use depdb_core::FrameworkDatabase;
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Framework name (the directory name of its graph file).
    pub framework: String,
}

#[derive(Debug, Serialize)]
struct Deps {
    framework: String,
    depends_on: Vec<String>,
}

pub fn run_deps(args: &DepsArgs, db: &FrameworkDatabase, mode: OutputMode) -> anyhow::Result<()> {
    let deps = Deps {
        framework: args.framework.clone(),
        depends_on: db.framework_dependencies(&args.framework)?.into_iter().collect(),
    };
    render_mode(
        mode,
        &deps,
        |d, w| {
            for name in &d.depends_on {
                writeln!(w, "{name}")?;
            }
            Ok(())
        },
        |d, w| {
            pretty_section(w, &format!("{} depends on ({})", d.framework, d.depends_on.len()))?;
            for name in &d.depends_on {
                writeln!(w, "  {name}")?;
            }
            Ok(())
        },
    )
}
