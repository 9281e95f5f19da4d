//! `galois closures`: list every closed set in lectic order.

use std::io::{self, Write};

use galois_core::ComparableSet;
use serde::Serialize;
use tracing::info;

use super::InputArgs;
use crate::input::Input;
use crate::output::{OutputFormat, Renderable, render};

#[derive(Debug, Serialize)]
struct ClosuresOutput {
    kind: &'static str,
    closures: Vec<ClosedSet>,
}

#[derive(Debug, Serialize)]
struct ClosedSet {
    extent: ComparableSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent: Option<ComparableSet<String>>,
}

impl Renderable for ClosuresOutput {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for closed in &self.closures {
            match &closed.intent {
                Some(intent) => writeln!(w, "{} / {intent}", closed.extent)?,
                None => writeln!(w, "{}", closed.extent)?,
            }
        }
        Ok(())
    }
}

/// Execute `galois closures`.
pub fn run_closures(
    args: &InputArgs,
    format: OutputFormat,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    let input = Input::load(&args.input)?;
    let closures: Vec<ClosedSet> = input
        .system()
        .all_closures()
        .into_iter()
        .map(|concept| ClosedSet {
            extent: concept.extent().cloned().unwrap_or_default(),
            intent: concept.intent().cloned(),
        })
        .collect();
    info!(count = closures.len(), "closed sets enumerated");

    render(
        format,
        &ClosuresOutput {
            kind: input.kind(),
            closures,
        },
        w,
    )
}
