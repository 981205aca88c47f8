//! `depdb dump`: the whole database, target by target.


use clap::Args;
use depdb_core::FrameworkDatabase;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct DumpArgs {}

pub fn run_dump(_args: &DumpArgs, db: &FrameworkDatabase, mode: OutputMode) -> anyhow::Result<()> {
    render_mode(
        mode,
        db,
        |db, w| {
            for fw in db {
                for target in fw.targets() {
                    for dep in fw.target_dependencies(target) {
                        writeln!(w, "{}\t{target}\t{dep}", fw.name)?;
                    }
                }
                for extra in fw.extra_frameworks() {
                    writeln!(w, "{}\t-\t{extra}", fw.name)?;
                }
            }
            Ok(())
        },
        |db, w| {
            for fw in db {
                pretty_section(w, &format!("{} ({})", fw.name, fw.tier))?;
                for target in fw.targets() {
                    let deps: Vec<&str> = fw.target_dependencies(target).collect();
                    writeln!(w, "  {target} -> {}", deps.join(", "))?;
                }
                if !fw.extra_frameworks().is_empty() {
                    let extras: Vec<&str> =
                        fw.extra_frameworks().iter().map(String::as_str).collect();
                    writeln!(w, "  extra frameworks: {}", extras.join(", "))?;
                }
                writeln!(w)?;
            }
            Ok(())
        },
    )
}
