//! `depdb externals`: dependency targets no framework owns.


use clap::Args;
use depdb_core::FrameworkDatabase;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ExternalsArgs {}

pub fn run_externals(
    _args: &ExternalsArgs,
    db: &FrameworkDatabase,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let external: Vec<String> = db.find_external_targets().into_iter().collect();
    render_mode(
        mode,
        &external,
        |targets, w| {
            for t in targets {
                writeln!(w, "{t}")?;
            }
            Ok(())
        },
        |targets, w| {
            pretty_section(w, &format!("External targets ({})", targets.len()))?;
            for t in targets {
                writeln!(w, "  {t}")?;
            }
            Ok(())
        },
    )
}
