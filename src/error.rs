//! Error taxonomy for expression evaluation and operator-tree execution.

use thiserror::Error;

use crate::term::Term;

/// Crate-wide result alias for query-level operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Failures raised while evaluating an expression against one solution.
///
/// Filter and Order recover from these locally; everything else propagates
/// them inside [`QueryError::Eval`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Operand types are not valid for the operation.
    #[error("type error: {op} is undefined for {operands}")]
    TypeError {
        /// Operator or function symbol.
        op: &'static str,
        /// Rendered operands.
        operands: String,
    },
    /// Expression referenced a variable the solution leaves unbound.
    #[error("variable {var} is unbound")]
    Unbound {
        /// Rendered variable.
        var: String,
    },
    /// Integer or decimal division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Value cannot be represented in the requested datatype.
    #[error("'{lexical}' is not a valid {datatype}")]
    InvalidLexical {
        /// Source lexical form.
        lexical: String,
        /// Target datatype IRI.
        datatype: String,
    },
    /// Call to a function outside the supported set.
    #[error("unknown function {iri}")]
    UnknownFunction {
        /// Function IRI.
        iri: String,
    },
    /// Function invoked with the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), got {found}")]
    Arity {
        /// Function name.
        function: String,
        /// Expected argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },
}

impl EvalError {
    /// Builds a [`EvalError::TypeError`] rendering `terms` as the operands.
    pub fn type_error(op: &'static str, terms: &[&Term]) -> Self {
        let operands = terms
            .iter()
            .map(|term| term.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        EvalError::TypeError { op, operands }
    }

    /// True for the type-error class of failures.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            EvalError::TypeError { .. } | EvalError::InvalidLexical { .. }
        )
    }

    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::TypeError { .. } => "TypeError",
            EvalError::Unbound { .. } => "Unbound",
            EvalError::DivisionByZero => "DivisionByZero",
            EvalError::InvalidLexical { .. } => "TypeError",
            EvalError::UnknownFunction { .. } => "UnknownFunction",
            EvalError::Arity { .. } => "Arity",
        }
    }
}

/// Failures raised while validating or executing an operator tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The operator tree is structurally malformed.
    #[error("malformed operator tree: {0}")]
    Structure(String),
    /// A blank-node variable escapes the pattern that introduced it.
    #[error("blank node variable {var} is shared across join branches")]
    SharedBlankVariable {
        /// Rendered variable.
        var: String,
    },
    /// Execution nested deeper than the configured limit.
    #[error("operator nesting depth {depth} exceeds limit {max}")]
    DepthExceeded {
        /// Depth reached.
        depth: usize,
        /// Configured limit.
        max: usize,
    },
    /// The queryable failed to match patterns.
    #[error("queryable error: {0}")]
    Store(String),
    /// Expression evaluation failure that escaped its operator.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl QueryError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Structure(_) => "Structure",
            QueryError::SharedBlankVariable { .. } => "Structure",
            QueryError::DepthExceeded { .. } => "DepthExceeded",
            QueryError::Store(_) => "Store",
            QueryError::Eval(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_error_renders_operands() {
        let err = EvalError::type_error(">", &[&Term::iri("http://example/a"), &Term::from(1i64)]);
        assert_eq!(
            err.to_string(),
            "type error: > is undefined for <http://example/a>, 1"
        );
        assert!(err.is_type_error());
        assert_eq!(err.code(), "TypeError");
    }

    #[test]
    fn eval_errors_convert_into_query_errors() {
        let err: QueryError = EvalError::DivisionByZero.into();
        assert_eq!(err.code(), "DivisionByZero");
        assert!(!EvalError::DivisionByZero.is_type_error());
    }
}
