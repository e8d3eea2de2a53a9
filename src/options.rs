//! Options threaded through operator execution.

use crate::error::{QueryError, Result};

/// Evaluation context threaded through `execute` and `evaluate`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Nesting depth of the current call; the root executes at depth 0.
    pub depth: usize,
    /// Optional nesting limit. `None` leaves recursion unbounded.
    pub max_depth: Option<usize>,
    /// Surface non-type evaluation failures from Filter instead of
    /// excluding the solution.
    pub strict_filter_errors: bool,
}

impl ExecOptions {
    /// Root options with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for an operand call, one level deeper.
    pub fn nested(&self) -> Result<Self> {
        let depth = self.depth + 1;
        if let Some(max) = self.max_depth {
            if depth > max {
                return Err(QueryError::DepthExceeded { depth, max });
            }
        }
        Ok(Self {
            depth,
            ..self.clone()
        })
    }
}
