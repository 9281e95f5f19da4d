//! Output layer shared by every `galois` command.
//!
//! Each command builds a serializable result type implementing
//! [`Renderable`] and hands it to [`render`], which dispatches on the
//! resolved [`OutputFormat`]:
//!
//! - `dot`: a Graphviz digraph, bottom to top.
//! - `json`: the result serialized with `serde_json`.
//! - `text`: one line per node or row, for terminals and pipes.

use std::io::{self, Write};

use clap::ValueEnum;
use galois_core::{ConceptLattice, Lattice, NodeId, Reduced};
use serde::Serialize;

/// The three output formats supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Graphviz dot.
    Dot,
    /// Machine-readable JSON.
    Json,
    /// Plain text.
    Text,
}

impl OutputFormat {
    /// Parse a format name from the environment or a config file.
    ///
    /// Unknown values return `None` so resolution falls through.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            "text" | "plain" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Implemented by every command result.
pub trait Renderable {
    /// Plain text, one item per line.
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Graphviz dot. Results without a graph shape fall back to text.
    fn render_dot(&self, w: &mut dyn Write) -> io::Result<()> {
        self.render_text(w)
    }
}

/// Write `item` to `w` in `format`.
pub fn render<R: Renderable + Serialize>(
    format: OutputFormat,
    item: &R,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Dot => item.render_dot(w)?,
        OutputFormat::Text => item.render_text(w)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, item)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendered graphs
// ---------------------------------------------------------------------------

/// A lattice flattened for output: node idents, labels and labelled edges.
#[derive(Debug, Serialize)]
pub struct RenderedGraph {
    pub top: usize,
    pub bottom: usize,
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<RenderedEdge>,
}

#[derive(Debug, Serialize)]
pub struct RenderedNode {
    pub id: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RenderedEdge {
    pub from: usize,
    pub to: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RenderedGraph {
    /// Concepts labelled `extent / intent`, edges by their valuation.
    pub fn from_concepts(lattice: &ConceptLattice<String>) -> Self {
        let nodes = lattice
            .concepts()
            .map(|(id, concept)| RenderedNode {
                id: id.ident(),
                label: concept.to_string(),
                extent: concept.extent().map(|set| set.iter().cloned().collect()),
                intent: concept.intent().map(|set| set.iter().cloned().collect()),
            })
            .collect();
        let edges = lattice
            .lattice()
            .graph()
            .edges()
            .map(|edge| RenderedEdge {
                from: edge.from().ident(),
                to: edge.to().ident(),
                label: edge.content().map(ToString::to_string),
            })
            .collect();
        Self {
            top: lattice.lattice().top().ident(),
            bottom: lattice.lattice().bottom().ident(),
            nodes,
            edges,
        }
    }

    /// Irreducibles labelled by their element, placeholders left blank.
    pub fn from_reduced(lattice: &Lattice<Reduced<String>>) -> Self {
        let nodes = lattice
            .graph()
            .nodes()
            .map(|(id, label)| RenderedNode {
                id: id.ident(),
                label: label.to_string(),
                extent: None,
                intent: None,
            })
            .collect();
        Self {
            top: lattice.top().ident(),
            bottom: lattice.bottom().ident(),
            nodes,
            edges: plain_edges(lattice.graph().edges().map(|e| (e.from(), e.to()))),
        }
    }
}

fn plain_edges(pairs: impl Iterator<Item = (NodeId, NodeId)>) -> Vec<RenderedEdge> {
    pairs
        .map(|(from, to)| RenderedEdge {
            from: from.ident(),
            to: to.ident(),
            label: None,
        })
        .collect()
}

impl Renderable for RenderedGraph {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for node in &self.nodes {
            writeln!(w, "#{} {}", node.id, node.label)?;
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => writeln!(w, "#{} -> #{} {label}", edge.from, edge.to)?,
                None => writeln!(w, "#{} -> #{}", edge.from, edge.to)?,
            }
        }
        Ok(())
    }

    fn render_dot(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "digraph G {{")?;
        writeln!(w, "  rankdir=BT;")?;
        for node in &self.nodes {
            writeln!(w, "  {} [label=\"{}\"];", node.id, escape(&node.label))?;
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => writeln!(
                    w,
                    "  {} -> {} [label=\"{}\"];",
                    edge.from,
                    edge.to,
                    escape(label)
                )?,
                None => writeln!(w, "  {} -> {};", edge.from, edge.to)?,
            }
        }
        writeln!(w, "}}")
    }
}

/// Escape a label for a double-quoted dot string.
pub fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
