pub mod closures;
pub mod dependencies;
pub mod lattice;

use std::path::PathBuf;

use clap::Args;

/// The input file shared by every command.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Implicational system or context (`.json` or `.toml`).
    pub input: PathBuf,
}
