#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use depdb_core::DepDbConfig;
use input::InputArgs;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "depdb: framework dependency database from CMake graphviz output",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: $DEPDB_CONFIG or <config dir>/depdb/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep Qt dependencies in the model.
    #[arg(long, global = true)]
    with_qt: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List frameworks",
        after_help = "EXAMPLES:\n    # List every framework under docs/dot\n    depdb frameworks --dot-dir docs/dot"
    )]
    Frameworks {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        args: cmd::frameworks::FrameworksArgs,
    },

    #[command(
        about = "List dependency targets no framework owns",
        after_help = "EXAMPLES:\n    # Include Qt libraries\n    depdb externals --dot-dir docs/dot --with-qt"
    )]
    Externals {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        args: cmd::externals::ExternalsArgs,
    },

    #[command(
        about = "Drop frameworks that neither the root nor any kept framework uses",
        after_help = "EXAMPLES:\n    # Frameworks needed by kio\n    depdb reduce --root kio --dot-dir docs/dot"
    )]
    Reduce {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        args: cmd::reduce::ReduceArgs,
    },

    #[command(about = "Show the framework that owns a target")]
    Owner {
        #[command(flatten)]
        args: cmd::owner::OwnerArgs,
        #[command(flatten)]
        input: InputArgs,
    },

    #[command(about = "List the frameworks a framework depends on directly")]
    Deps {
        #[command(flatten)]
        args: cmd::deps::DepsArgs,
        #[command(flatten)]
        input: InputArgs,
    },

    #[command(about = "Dump every framework with its targets and dependencies")]
    Dump {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        args: cmd::dump::DumpArgs,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DEPDB_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "depdb=debug,depdb_core=debug,info"
        } else {
            "depdb=info,depdb_core=info,warn"
        })
    });

    let format = env::var("DEPDB_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<DepDbConfig> {
    let mut config = match &cli.config {
        Some(path) => DepDbConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DepDbConfig::discover()?,
    };
    if cli.with_qt {
        config.with_qt = true;
    }
    Ok(config)
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match &cli.command {
        Commands::Frameworks { input, args } => {
            let db = input::load_database(input, &config)?;
            cmd::frameworks::run_frameworks(args, &db, mode)
        }
        Commands::Externals { input, args } => {
            let db = input::load_database(input, &config)?;
            cmd::externals::run_externals(args, &db, mode)
        }
        Commands::Reduce { input, args } => {
            let mut db = input::load_database(input, &config)?;
            cmd::reduce::run_reduce(args, &mut db, mode)
        }
        Commands::Owner { input, args } => {
            let db = input::load_database(input, &config)?;
            cmd::owner::run_owner(args, &db, mode)
        }
        Commands::Deps { input, args } => {
            let db = input::load_database(input, &config)?;
            cmd::deps::run_deps(args, &db, mode)
        }
        Commands::Dump { input, args } => {
            let db = input::load_database(input, &config)?;
            cmd::dump::run_dump(args, &db, mode)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mode = resolve_output_mode(cli.format, cli.json);
    match run(cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut cli_error = err
                .downcast_ref::<depdb_core::Error>()
                .map_or_else(|| CliError::new(String::new()), CliError::from);
            cli_error.message = format!("{err:#}");
            if let Err(render_err) = render_error(mode, &cli_error) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "depdb", "reduce", "--root", "kio", "a.dot", "--with-qt", "--json",
        ])
        .expect("parse");
        assert!(cli.with_qt);
        assert!(cli.json);
        match cli.command {
            Commands::Reduce { input, args } => {
                assert_eq!(args.root, "kio");
                assert_eq!(input.files, [PathBuf::from("a.dot")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
