use std::fmt;

/// Machine-readable error codes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CycleDetected,
    UnknownNode,
    NotALattice,
    MissingExtent,
    MissingIntent,
    NothingToReduce,
    IncompleteDependencyGraph,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CycleDetected => "E1001",
            Self::UnknownNode => "E1002",
            Self::NotALattice => "E2001",
            Self::MissingExtent => "E3001",
            Self::MissingIntent => "E3002",
            Self::NothingToReduce => "E3003",
            Self::IncompleteDependencyGraph => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CycleDetected => "Graph contains a cycle",
            Self::UnknownNode => "Node not found",
            Self::NotALattice => "Graph is not a lattice",
            Self::MissingExtent => "Concept has no extent",
            Self::MissingIntent => "Concept has no intent",
            Self::NothingToReduce => "No complete extents or intents to reduce",
            Self::IncompleteDependencyGraph => "Dependency graph does not cover the universe",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::CycleDetected => Some("Collapse strongly connected components first."),
            Self::UnknownNode => None,
            Self::NotALattice => {
                Some("Check for a unique top and bottom, and unique joins and meets.")
            }
            Self::MissingExtent | Self::NothingToReduce => {
                Some("Generate the lattice from a closure system so every concept has an extent.")
            }
            Self::MissingIntent => Some("Use a context-backed closure system to obtain intents."),
            Self::IncompleteDependencyGraph => {
                Some("Build the dependency graph with `DependencyGraph::for_system`.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by graph, lattice and generation operations.
///
/// Node references are reported by their integer ident.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    #[error("graph contains a cycle")]
    Cyclic,

    #[error("edge #{from} -> #{to} would close the cycle {path:?}")]
    CycleDetected {
        from: usize,
        to: usize,
        path: Vec<usize>,
    },

    #[error("node #{0} not found")]
    UnknownNode(usize),

    #[error("not a lattice: {0}")]
    NotALattice(String),

    #[error("concept #{0} has no extent")]
    MissingExtent(usize),

    #[error("concept #{0} has no intent")]
    MissingIntent(usize),

    #[error("neither every extent nor every intent is present")]
    NothingToReduce,

    #[error("dependency graph has no node for element {0}")]
    IncompleteDependencyGraph(String),
}

impl LatticeError {
    /// The stable error code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Cyclic | Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
            Self::NotALattice(_) => ErrorCode::NotALattice,
            Self::MissingExtent(_) => ErrorCode::MissingExtent,
            Self::MissingIntent(_) => ErrorCode::MissingIntent,
            Self::NothingToReduce => ErrorCode::NothingToReduce,
            Self::IncompleteDependencyGraph(_) => ErrorCode::IncompleteDependencyGraph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, LatticeError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::CycleDetected,
            ErrorCode::UnknownNode,
            ErrorCode::NotALattice,
            ErrorCode::MissingExtent,
            ErrorCode::MissingIntent,
            ErrorCode::NothingToReduce,
            ErrorCode::IncompleteDependencyGraph,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MissingExtent.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn cycle_variants_share_a_code() {
        let err = LatticeError::CycleDetected {
            from: 2,
            to: 0,
            path: vec![2, 0, 1, 2],
        };
        assert_eq!(err.code(), LatticeError::Cyclic.code());
        assert_eq!(
            err.to_string(),
            "edge #2 -> #0 would close the cycle [2, 0, 1, 2]"
        );
    }
}
