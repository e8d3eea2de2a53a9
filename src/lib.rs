//! SPARQL algebra evaluation for Sombra.
//!
//! Queries are trees of [`Operator`]s whose leaves are basic graph patterns
//! matched by a [`Queryable`] store. Operators transform sequences of
//! [`Solution`]s; [`Expression`]s supply filter conditions and sort keys.
//!
//! ```
//! use sombra_sparql::{
//!     CompareOp, ExecOptions, Expression, MemoryStore, Operator, OrderKey, Term, Triple,
//!     TriplePattern, Var,
//! };
//!
//! let store: MemoryStore = [
//!     Triple::new(Term::iri("http://example/x"), Term::iri("http://example/p"), 2i64),
//!     Triple::new(Term::iri("http://example/x"), Term::iri("http://example/p"), 1i64),
//! ]
//! .into_iter()
//! .collect();
//!
//! let leaf = Operator::bgp(vec![TriplePattern::new(
//!     Var::new("s"),
//!     Term::iri("http://example/p"),
//!     Var::new("o"),
//! )]);
//! let query = Operator::order(
//!     vec![OrderKey::asc(Expression::var("o"))],
//!     Operator::filter(
//!         Expression::compare(CompareOp::Gt, Expression::var("o"), Expression::term(0i64)),
//!         leaf,
//!     ),
//! );
//! let solutions = query.execute(&store, &ExecOptions::default()).unwrap();
//! assert_eq!(solutions.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algebra;
pub mod config;
pub mod error;
pub mod expr;
pub mod options;
pub mod pattern;
pub mod profile;
pub mod queryable;
pub mod solution;
pub mod term;

pub use algebra::{Arity, GraphPattern, Operand, Operator, OrderKey, SortDirection};
pub use config::{ConfigError, EvalConfig};
pub use error::{EvalError, QueryError, Result};
pub use expr::{ArithOp, CompareOp, Expression};
pub use options::ExecOptions;
pub use pattern::{GraphContext, TermPattern, Triple, TriplePattern};
pub use profile::{profile_snapshot, reset_profile, ProfileSnapshot};
pub use queryable::{MemoryStore, Quad, Queryable};
pub use solution::{Solution, SolutionSequence, Var};
pub use term::{BlankNode, Iri, Literal, NativeValue, Term};
