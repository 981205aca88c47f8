//! `depdb owner <target>`: the framework that builds a target.


use clap::Args;
use depdb_core::FrameworkDatabase;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, render_mode};

#[derive(Args, Debug)]
pub struct OwnerArgs {
    /// Target name, without the framework prefix (e.g. `KIOCore`).
    pub target: String,
}

#[derive(Debug, Serialize)]
struct Owner<'a> {
    target: &'a str,
    framework: &'a str,
    tier: &'a str,
}

pub fn run_owner(args: &OwnerArgs, db: &FrameworkDatabase, mode: OutputMode) -> anyhow::Result<()> {
    let fw = db.framework_for_target(&args.target)?;
    let owner = Owner {
        target: &args.target,
        framework: &fw.name,
        tier: &fw.tier,
    };
    render_mode(
        mode,
        &owner,
        |o, w| writeln!(w, "{}\t{}", o.framework, o.tier),
        |o, w| {
            pretty_kv(w, "Target", o.target)?;
            pretty_kv(w, "Framework", o.framework)?;
            pretty_kv(w, "Tier", o.tier)
        },
    )
}
