#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;

use std::env;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::OutputFormat;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "galois: closed set lattices, dependency graphs and implicational bases",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (overrides GALOIS_FORMAT and the config file).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Configuration file (default: ./galois.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Generate the closed set lattice of an input",
        long_about = "Generate the closed set lattice of an implicational system or a \
                      formal context, optionally reduce it, and render it.",
        after_help = "EXAMPLES:\n    # Hasse diagram as Graphviz\n    galois lattice rules.toml --format dot\n\n    # Every inclusion, as JSON\n    galois lattice ctx.json --algorithm complete --no-hasse --format json\n\n    # Label irreducibles\n    galois lattice ctx.json --reduction irreducibles"
    )]
    Lattice(cmd::lattice::LatticeArgs),

    #[command(about = "List every closed set in lectic order")]
    Closures(cmd::InputArgs),

    #[command(
        about = "Show the dependency graph and implicational basis",
        long_about = "Run the diagram generator and print the dependency graph it \
                      records (edges with their minimal valuations) and the \
                      implicational basis read off it."
    )]
    Dependencies(cmd::InputArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GALOIS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "galois=debug,info"
        } else {
            "galois=info,warn"
        })
    });

    let format = env::var("GALOIS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    let format = config::resolve_format(
        cli.format,
        env::var("GALOIS_FORMAT").ok().as_deref(),
        config.format.as_deref(),
    );
    debug!(?format, "output format resolved");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Lattice(args) => cmd::lattice::run_lattice(args, &config, format, &mut out),
        Commands::Closures(args) => cmd::closures::run_closures(args, format, &mut out),
        Commands::Dependencies(args) => {
            cmd::dependencies::run_dependencies(args, format, &mut out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["galois", "closures", "rules.toml", "--format", "json", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Closures(_)));
    }

    #[test]
    fn lattice_flags_parse() {
        let cli = Cli::parse_from([
            "galois",
            "lattice",
            "ctx.json",
            "--algorithm",
            "complete",
            "--reduction",
            "irreducibles",
            "--no-hasse",
        ]);
        let Commands::Lattice(args) = cli.command else {
            panic!("expected the lattice command");
        };
        assert_eq!(args.algorithm, Some(config::Algorithm::Complete));
        assert_eq!(args.reduction, Some(config::Reduction::Irreducibles));
        assert!(args.no_hasse);
        assert!(!args.edge_valuation);
    }
}
