//! `galois lattice`: generate the closed set lattice of an input and render
//! it, optionally reduced or with valuated edges.

use std::io::Write;

use anyhow::Context as _;
use clap::Args;
use galois_core::ConceptLattice;
use tracing::{info, warn};

use super::InputArgs;
use crate::config::{Algorithm, GenerationConfig, Reduction};
use crate::input::Input;
use crate::output::{OutputFormat, RenderedGraph, render};

/// Arguments for `galois lattice`. Unset flags fall back to the config file.
#[derive(Args, Debug)]
pub struct LatticeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Generator to run.
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Reduction applied before output.
    #[arg(long, value_enum)]
    pub reduction: Option<Reduction>,

    /// Label every edge with the elements it adds.
    #[arg(long)]
    pub edge_valuation: bool,

    /// Keep every inclusion of a complete lattice instead of its covers.
    #[arg(long)]
    pub no_hasse: bool,
}

/// Flags merged over the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settings {
    algorithm: Algorithm,
    reduction: Reduction,
    edge_valuation: bool,
    hasse: bool,
}

impl Settings {
    fn resolve(args: &LatticeArgs, config: &GenerationConfig) -> Self {
        Self {
            algorithm: args.algorithm.unwrap_or(config.algorithm),
            reduction: args.reduction.unwrap_or(config.reduction),
            edge_valuation: args.edge_valuation || config.edge_valuation,
            hasse: config.hasse && !args.no_hasse,
        }
    }
}

/// Execute `galois lattice`.
pub fn run_lattice(
    args: &LatticeArgs,
    config: &GenerationConfig,
    format: OutputFormat,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    let settings = Settings::resolve(args, config);
    let input = Input::load(&args.input.input)?;

    let mut lattice = match settings.algorithm {
        Algorithm::Diagram => ConceptLattice::diagram_lattice(input.system()),
        Algorithm::Complete if settings.hasse => {
            ConceptLattice::complete_lattice(input.system()).hasse()
        }
        Algorithm::Complete => ConceptLattice::complete_lattice(input.system()),
    };
    info!(
        algorithm = ?settings.algorithm,
        concepts = lattice.node_count(),
        edges = lattice.edge_count(),
        "lattice generated"
    );

    if settings.edge_valuation && settings.reduction != Reduction::None {
        warn!("edge valuation is ignored when a reduction is applied");
    }

    let graph = match settings.reduction {
        Reduction::None => {
            if settings.edge_valuation {
                lattice.make_edge_valuation()?;
            }
            RenderedGraph::from_concepts(&lattice)
        }
        Reduction::Join => RenderedGraph::from_reduced(
            &lattice.join_reduction().context("join reduction failed")?,
        ),
        Reduction::Meet => RenderedGraph::from_reduced(
            &lattice.meet_reduction().with_context(|| {
                format!("meet reduction failed for {} input", input.kind())
            })?,
        ),
        Reduction::Irreducibles => RenderedGraph::from_reduced(
            &lattice
                .irreducibles_reduction()
                .context("irreducibles reduction failed")?,
        ),
    };

    render(format, &graph, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> LatticeArgs {
        LatticeArgs {
            input: InputArgs {
                input: PathBuf::from("unused.toml"),
            },
            algorithm: None,
            reduction: None,
            edge_valuation: false,
            no_hasse: false,
        }
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = GenerationConfig {
            algorithm: Algorithm::Complete,
            reduction: Reduction::Join,
            edge_valuation: true,
            ..GenerationConfig::default()
        };
        let settings = Settings::resolve(&args(), &config);
        assert_eq!(settings.algorithm, Algorithm::Complete);
        assert_eq!(settings.reduction, Reduction::Join);
        assert!(settings.edge_valuation);
        assert!(settings.hasse);
    }

    #[test]
    fn flags_override_config() {
        let mut flags = args();
        flags.algorithm = Some(Algorithm::Diagram);
        flags.reduction = Some(Reduction::None);
        flags.no_hasse = true;
        let config = GenerationConfig {
            algorithm: Algorithm::Complete,
            reduction: Reduction::Meet,
            ..GenerationConfig::default()
        };
        let settings = Settings::resolve(&flags, &config);
        assert_eq!(settings.algorithm, Algorithm::Diagram);
        assert_eq!(settings.reduction, Reduction::None);
        assert!(!settings.hasse);
    }
}
