//! Query-shaped operators over solution sequences.
//!
//! An [`Operator`] tree is built once, optionally checked with
//! [`Operator::validate`], and executed any number of times against a
//! [`Queryable`]. Execution is a synchronous top-down walk: each operator
//! materializes its operands' sequences, transforms them, and returns a new
//! sequence. Only `order` changes the order of solutions.

mod bgp;
mod distinct;
mod filter;
mod join;
mod order;
mod project;
mod reduced;
mod sparql;

use std::collections::BTreeSet;
use std::fmt;

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::expr::Expression;
use crate::options::ExecOptions;
use crate::pattern::TriplePattern;
use crate::queryable::Queryable;
use crate::solution::{Solution, SolutionSequence, Var};
use crate::term::Iri;

pub use bgp::GraphPattern;
pub use order::{OrderKey, SortDirection};

/// Operand count class of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No operands.
    Nullary,
    /// Exactly one operand.
    Unary,
    /// Exactly two operands.
    Binary,
    /// Any number of operands.
    Nary,
}

/// Algebra operator node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Basic graph pattern leaf.
    Bgp(GraphPattern),
    /// Join of two sub-queries.
    Join(Box<Operator>, Box<Operator>),
    /// Keeps solutions whose condition is true.
    Filter {
        /// Boolean-valued condition.
        condition: Expression,
        /// Nested query.
        input: Box<Operator>,
    },
    /// Sorts solutions by a list of keys.
    Order {
        /// Sort keys, highest priority first.
        keys: Vec<OrderKey>,
        /// Nested query.
        input: Box<Operator>,
    },
    /// Removes adjacent duplicate solutions.
    Reduced(Box<Operator>),
    /// Removes all duplicate solutions.
    Distinct(Box<Operator>),
    /// Restricts solutions to a list of variables.
    Project {
        /// Variables to keep.
        vars: Vec<Var>,
        /// Nested query.
        input: Box<Operator>,
    },
}

/// Borrowed view of one operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand<'a> {
    /// A nested operator.
    Operator(&'a Operator),
    /// A filter condition.
    Expression(&'a Expression),
    /// ORDER BY keys.
    Keys(&'a [OrderKey]),
    /// Triple patterns of a leaf.
    Patterns(&'a [TriplePattern]),
    /// Projection list.
    Vars(&'a [Var]),
}

impl Operator {
    /// Basic graph pattern over the default graph.
    pub fn bgp(patterns: Vec<TriplePattern>) -> Self {
        Operator::Bgp(GraphPattern::new(patterns))
    }

    /// Graph pattern scoped to the named graph `graph`.
    pub fn graph(graph: Iri, patterns: Vec<TriplePattern>) -> Self {
        Operator::Bgp(GraphPattern::in_graph(graph, patterns))
    }

    /// `(join left right)`
    pub fn join(left: Operator, right: Operator) -> Self {
        Operator::Join(Box::new(left), Box::new(right))
    }

    /// `(filter condition input)`
    pub fn filter(condition: Expression, input: Operator) -> Self {
        Operator::Filter {
            condition,
            input: Box::new(input),
        }
    }

    /// `(order (keys…) input)`
    pub fn order(keys: Vec<OrderKey>, input: Operator) -> Self {
        Operator::Order {
            keys,
            input: Box::new(input),
        }
    }

    /// `(reduced input)`
    pub fn reduced(input: Operator) -> Self {
        Operator::Reduced(Box::new(input))
    }

    /// `(distinct input)`
    pub fn distinct(input: Operator) -> Self {
        Operator::Distinct(Box::new(input))
    }

    /// `(project (vars…) input)`
    pub fn project(vars: Vec<Var>, input: Operator) -> Self {
        Operator::Project {
            vars,
            input: Box::new(input),
        }
    }

    /// Operator tag as it appears in SSE.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Bgp(_) => "bgp",
            Operator::Join(..) => "join",
            Operator::Filter { .. } => "filter",
            Operator::Order { .. } => "order",
            Operator::Reduced(_) => "reduced",
            Operator::Distinct(_) => "distinct",
            Operator::Project { .. } => "project",
        }
    }

    /// Operand count class.
    pub fn arity(&self) -> Arity {
        match self {
            Operator::Bgp(_) => Arity::Nary,
            Operator::Reduced(_) | Operator::Distinct(_) => Arity::Unary,
            Operator::Join(..)
            | Operator::Filter { .. }
            | Operator::Order { .. }
            | Operator::Project { .. } => Arity::Binary,
        }
    }

    /// Operands in positional order.
    pub fn operands(&self) -> Vec<Operand<'_>> {
        match self {
            Operator::Bgp(pattern) => vec![Operand::Patterns(pattern.patterns())],
            Operator::Join(left, right) => vec![Operand::Operator(left), Operand::Operator(right)],
            Operator::Filter { condition, input } => {
                vec![Operand::Expression(condition), Operand::Operator(input)]
            }
            Operator::Order { keys, input } => vec![Operand::Keys(keys), Operand::Operator(input)],
            Operator::Reduced(input) | Operator::Distinct(input) => vec![Operand::Operator(input)],
            Operator::Project { vars, input } => {
                vec![Operand::Vars(vars), Operand::Operator(input)]
            }
        }
    }

    /// Operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<Operand<'_>> {
        self.operands().into_iter().nth(index)
    }

    /// Executes the tree against `queryable`.
    ///
    /// Operands execute one level deeper than their parent; exceeding
    /// [`ExecOptions::max_depth`] fails with [`QueryError::DepthExceeded`].
    pub fn execute(
        &self,
        queryable: &dyn Queryable,
        options: &ExecOptions,
    ) -> Result<SolutionSequence> {
        trace!(
            depth = options.depth,
            op = self.name(),
            "sparql.operator.execute"
        );
        match self {
            Operator::Bgp(pattern) => bgp::execute(pattern, queryable, options),
            Operator::Join(left, right) => {
                let nested = options.nested()?;
                let left = left.execute(queryable, &nested)?;
                let right = right.execute(queryable, &nested)?;
                join::execute(left, right, options)
            }
            Operator::Filter { condition, input } => {
                let nested = options.nested()?;
                let solutions = input.execute(queryable, &nested)?;
                filter::execute(condition, solutions, options)
            }
            Operator::Order { keys, input } => {
                let nested = options.nested()?;
                let solutions = input.execute(queryable, &nested)?;
                order::execute(keys, solutions, options)
            }
            Operator::Reduced(input) => {
                let solutions = input.execute(queryable, &options.nested()?)?;
                reduced::execute(solutions, options)
            }
            Operator::Distinct(input) => {
                let solutions = input.execute(queryable, &options.nested()?)?;
                distinct::execute(solutions, options)
            }
            Operator::Project { vars, input } => {
                let solutions = input.execute(queryable, &options.nested()?)?;
                project::execute(vars, solutions, options)
            }
        }
    }

    /// Executes the tree and hands each resulting solution to `sink`, in
    /// order, before returning the full sequence.
    pub fn execute_each<F>(
        &self,
        queryable: &dyn Queryable,
        options: &ExecOptions,
        mut sink: F,
    ) -> Result<SolutionSequence>
    where
        F: FnMut(&Solution),
    {
        let solutions = self.execute(queryable, options)?;
        solutions.iter().for_each(&mut sink);
        Ok(solutions)
    }

    /// Checks variable scoping across the tree.
    ///
    /// A non-distinguished variable (`??x`) may not occur on both sides of a
    /// join, except when a filter sits directly over a join of two leaf
    /// patterns in the same graph. An `order` needs at least one key and a
    /// projection may only name distinguished variables.
    pub fn validate(&self) -> Result<()> {
        match self {
            Operator::Bgp(_) => Ok(()),
            Operator::Join(left, right) => {
                left.validate()?;
                right.validate()?;
                let left_vars = left.blank_vars();
                let right_vars = right.blank_vars();
                match left_vars.intersection(&right_vars).next() {
                    Some(var) => Err(QueryError::SharedBlankVariable {
                        var: var.to_string(),
                    }),
                    None => Ok(()),
                }
            }
            Operator::Filter { input, .. } => {
                if input.is_leaf_join() {
                    Ok(())
                } else {
                    input.validate()
                }
            }
            Operator::Order { keys, input } => {
                if keys.is_empty() {
                    let reason = "order requires at least one key";
                    return Err(QueryError::Structure(reason.into()));
                }
                input.validate()
            }
            Operator::Project { vars, input } => {
                if let Some(var) = vars.iter().find(|var| !var.is_distinguished()) {
                    return Err(QueryError::Structure(format!(
                        "cannot project non-distinguished variable {var}"
                    )));
                }
                input.validate()
            }
            Operator::Reduced(input) | Operator::Distinct(input) => input.validate(),
        }
    }

    /// A join of two leaf patterns that share one graph scope.
    fn is_leaf_join(&self) -> bool {
        match self {
            Operator::Join(left, right) => match (left.as_ref(), right.as_ref()) {
                (Operator::Bgp(l), Operator::Bgp(r)) => l.graph() == r.graph(),
                _ => false,
            },
            _ => false,
        }
    }

    fn blank_vars(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_blank_vars(&mut vars);
        vars
    }

    fn collect_blank_vars(&self, out: &mut BTreeSet<Var>) {
        match self {
            Operator::Bgp(pattern) => pattern.collect_blank_vars(out),
            Operator::Join(left, right) => {
                left.collect_blank_vars(out);
                right.collect_blank_vars(out);
            }
            Operator::Filter { input, .. }
            | Operator::Order { input, .. }
            | Operator::Reduced(input)
            | Operator::Distinct(input)
            | Operator::Project { input, .. } => input.collect_blank_vars(out),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Bgp(pattern) => fmt::Display::fmt(pattern, f),
            Operator::Join(left, right) => write!(f, "(join {left} {right})"),
            Operator::Filter { condition, input } => write!(f, "(filter {condition} {input})"),
            Operator::Order { keys, input } => {
                f.write_str("(order (")?;
                for (idx, key) in keys.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}")?;
                }
                write!(f, ") {input})")
            }
            Operator::Reduced(input) => write!(f, "(reduced {input})"),
            Operator::Distinct(input) => write!(f, "(distinct {input})"),
            Operator::Project { vars, input } => {
                f.write_str("(project (")?;
                for (idx, var) in vars.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{var}")?;
                }
                write!(f, ") {input})")
            }
        }
    }
}
