//! `galois dependencies`: the dependency graph recorded by Bordat's
//! algorithm, and the implicational basis read off it.

use std::io::{self, Write};

use anyhow::Context as _;
use galois_core::{ComparableSet, ConceptLattice, Rule};
use serde::Serialize;
use tracing::info;

use super::InputArgs;
use crate::input::Input;
use crate::output::{OutputFormat, Renderable, escape, render};

#[derive(Debug, Serialize)]
struct DependenciesOutput {
    elements: Vec<String>,
    dependencies: Vec<Dependency>,
    basis: Vec<Rule<String>>,
}

/// `from` lies in the closure of `to` plus any one of `valuation`.
#[derive(Debug, Serialize)]
struct Dependency {
    from: String,
    to: String,
    valuation: Vec<ComparableSet<String>>,
}

impl Dependency {
    fn valuation_label(&self) -> String {
        self.valuation
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Renderable for DependenciesOutput {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for dependency in &self.dependencies {
            writeln!(
                w,
                "{} -> {} {}",
                dependency.from,
                dependency.to,
                dependency.valuation_label()
            )?;
        }
        if !self.basis.is_empty() {
            writeln!(w)?;
            writeln!(w, "basis:")?;
            for rule in &self.basis {
                writeln!(w, "  {rule}")?;
            }
        }
        Ok(())
    }

    fn render_dot(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "digraph G {{")?;
        for element in &self.elements {
            writeln!(w, "  \"{}\";", escape(element))?;
        }
        for dependency in &self.dependencies {
            writeln!(
                w,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&dependency.from),
                escape(&dependency.to),
                escape(&dependency.valuation_label())
            )?;
        }
        writeln!(w, "}}")
    }
}

/// Execute `galois dependencies`.
pub fn run_dependencies(
    args: &InputArgs,
    format: OutputFormat,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    let input = Input::load(&args.input)?;
    let lattice = ConceptLattice::diagram_lattice(input.system());
    let graph = lattice
        .dependency_graph()
        .context("diagram generation recorded no dependency graph")?;

    let elements = graph.graph().nodes().map(|(_, e)| e.clone()).collect();
    let dependencies: Vec<Dependency> = graph
        .dependencies()
        .map(|(from, to, valuation)| Dependency {
            from: from.clone(),
            to: to.clone(),
            valuation: valuation.iter().cloned().collect(),
        })
        .collect();
    let basis = graph.implicational_basis().rules().to_vec();
    info!(
        dependencies = dependencies.len(),
        rules = basis.len(),
        "dependency graph computed"
    );

    render(
        format,
        &DependenciesOutput {
            elements,
            dependencies,
            basis,
        },
        w,
    )
}
