//! Input files: an implicational system or a formal context, as JSON or TOML.
//!
//! Both shapes carry a `kind` tag:
//!
//! ```toml
//! kind = "implications"
//! elements = ["a", "b", "c"]
//!
//! [[rules]]
//! premise = ["a"]
//! conclusion = ["b"]
//! ```
//!
//! ```json
//! { "kind": "context", "incidence": { "o1": ["a"], "o2": ["a", "b"] } }
//! ```

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use galois_core::{ClosureSystem, Context, ImplicationalSystem};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    Implications(ImplicationalSystem<String>),
    Context(Context<String>),
}

impl Input {
    /// Read and parse `path`, choosing the parser from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let input: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            _ => bail!(
                "Unsupported input {}: expected a .json or .toml file",
                path.display()
            ),
        };
        tracing::debug!(path = %path.display(), kind = input.kind(), "input loaded");
        Ok(input)
    }

    /// The closure system described by the file.
    pub fn system(&self) -> &dyn ClosureSystem<Element = String> {
        match self {
            Self::Implications(system) => system,
            Self::Context(context) => context,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Implications(_) => "implications",
            Self::Context(_) => "context",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galois_core::ComparableSet;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write input");
        path
    }

    #[test]
    fn loads_implications_from_toml() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(
            &dir,
            "rules.toml",
            "kind = \"implications\"\nelements = [\"a\", \"b\"]\n\n[[rules]]\npremise = [\"a\"]\nconclusion = [\"b\"]\n",
        );
        let input = Input::load(&path).expect("valid input");
        assert_eq!(input.kind(), "implications");
        let closed = input
            .system()
            .closure(&ComparableSet::singleton("a".to_string()));
        assert_eq!(closed.len(), 2);
    }

    #[test]
    fn loads_a_context_from_json() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(
            &dir,
            "ctx.json",
            r#"{"kind": "context", "incidence": {"o1": ["a"], "o2": ["a", "b"]}}"#,
        );
        let input = Input::load(&path).expect("valid input");
        assert_eq!(input.kind(), "context");
        // Every object has `a`.
        assert_eq!(
            input.system().closure(&ComparableSet::new()),
            ComparableSet::singleton("a".to_string())
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "rules.yaml", "kind: implications");
        let err = Input::load(&path).expect_err("yaml is not supported");
        assert!(err.to_string().contains("Unsupported input"), "{err}");
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "bad.json", r#"{"kind": "poset"}"#);
        let err = Input::load(&path).expect_err("unknown kind");
        assert!(err.to_string().contains("Failed to parse"), "{err}");
    }
}
