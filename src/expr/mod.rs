//! Expression-shaped operators evaluated against a single solution.
//!
//! Filter conditions and ORDER BY keys are [`Expression`] trees. Evaluation
//! returns either a [`Term`] or a typed [`EvalError`]; callers decide how a
//! failure degrades (Filter drops the solution, Order treats it as unbound).

pub mod compare;
mod ebv;
mod functions;
mod numeric;

use std::fmt;

use crate::algebra::Arity;
use crate::error::EvalError;
use crate::options::ExecOptions;
use crate::solution::{Solution, Var};
use crate::term::{Iri, Literal, Term};

pub use compare::{compare, compare_for_order, term_equal, CompareOp};
pub use ebv::ebv;
pub use functions::call;
pub use numeric::ArithOp;

use numeric::Numeric;

/// Expression tree node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Variable reference; unbound variables fail evaluation.
    Var(Var),
    /// Constant term.
    Term(Term),
    /// Relational comparison.
    Compare(CompareOp, Box<Expression>, Box<Expression>),
    /// Binary arithmetic.
    Arith(ArithOp, Box<Expression>, Box<Expression>),
    /// Unary minus.
    Neg(Box<Expression>),
    /// Logical and, error tolerant.
    And(Box<Expression>, Box<Expression>),
    /// Logical or, error tolerant.
    Or(Box<Expression>, Box<Expression>),
    /// Logical negation of the effective boolean value.
    Not(Box<Expression>),
    /// `BOUND(?x)`
    Bound(Var),
    /// `STR(e)`
    Str(Box<Expression>),
    /// Function call by IRI.
    Call {
        /// Function IRI.
        function: Iri,
        /// Argument expressions.
        args: Vec<Expression>,
    },
    /// Expression list: true when every member is true.
    List(Vec<Expression>),
}

impl Expression {
    /// Variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Var(Var::new(name))
    }

    /// Constant term.
    pub fn term(term: impl Into<Term>) -> Self {
        Expression::Term(term.into())
    }

    /// Relational comparison `(op left right)`.
    pub fn compare(op: CompareOp, left: Expression, right: Expression) -> Self {
        Expression::Compare(op, Box::new(left), Box::new(right))
    }

    /// Binary arithmetic `(op left right)`.
    pub fn arith(op: ArithOp, left: Expression, right: Expression) -> Self {
        Expression::Arith(op, Box::new(left), Box::new(right))
    }

    /// Unary minus.
    pub fn neg(operand: Expression) -> Self {
        Expression::Neg(Box::new(operand))
    }

    /// Logical and.
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    /// Logical or.
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    /// Logical not.
    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expression) -> Self {
        Expression::Not(Box::new(operand))
    }

    /// `BOUND(?name)`.
    pub fn bound(name: impl Into<String>) -> Self {
        Expression::Bound(Var::new(name))
    }

    /// `STR(operand)`.
    pub fn str(operand: Expression) -> Self {
        Expression::Str(Box::new(operand))
    }

    /// Function call.
    pub fn call(function: Iri, args: Vec<Expression>) -> Self {
        Expression::Call { function, args }
    }

    /// Expression list.
    pub fn list(members: Vec<Expression>) -> Self {
        Expression::List(members)
    }

    /// Operator tag as it appears in SSE.
    pub fn name(&self) -> String {
        match self {
            Expression::Var(_) => "var".to_owned(),
            Expression::Term(_) => "term".to_owned(),
            Expression::Compare(op, ..) => op.symbol().to_owned(),
            Expression::Arith(op, ..) => op.symbol().to_owned(),
            Expression::Neg(_) => "-".to_owned(),
            Expression::And(..) => "&&".to_owned(),
            Expression::Or(..) => "||".to_owned(),
            Expression::Not(_) => "!".to_owned(),
            Expression::Bound(_) => "bound".to_owned(),
            Expression::Str(_) => "str".to_owned(),
            Expression::Call { function, .. } => function.to_string(),
            Expression::List(_) => "exprlist".to_owned(),
        }
    }

    /// Operand count class.
    pub fn arity(&self) -> Arity {
        match self {
            Expression::Var(_) | Expression::Term(_) => Arity::Nullary,
            Expression::Neg(_) | Expression::Not(_) | Expression::Bound(_) | Expression::Str(_) => {
                Arity::Unary
            }
            Expression::Compare(..)
            | Expression::Arith(..)
            | Expression::And(..)
            | Expression::Or(..) => Arity::Binary,
            Expression::Call { .. } | Expression::List(_) => Arity::Nary,
        }
    }

    /// Evaluates the expression in the binding context of `solution`.
    pub fn evaluate(&self, solution: &Solution, options: &ExecOptions) -> Result<Term, EvalError> {
        match self {
            Expression::Var(var) => solution.get(var).cloned().ok_or_else(|| EvalError::Unbound {
                var: var.to_string(),
            }),
            Expression::Term(term) => Ok(term.clone()),
            Expression::Compare(op, left, right) => {
                let left = left.evaluate(solution, options)?;
                let right = right.evaluate(solution, options)?;
                op.apply(&left, &right)
            }
            Expression::Arith(op, left, right) => {
                let left = left.evaluate(solution, options)?;
                let right = right.evaluate(solution, options)?;
                op.apply(&left, &right)
            }
            Expression::Neg(operand) => {
                let value = operand.evaluate(solution, options)?;
                match Numeric::from_term(&value) {
                    Some(number) => Ok(Term::Literal(number.negate().into_literal())),
                    None => Err(EvalError::type_error("-", &[&value])),
                }
            }
            Expression::And(left, right) => {
                let left = left.evaluate_ebv(solution, options);
                let right = right.evaluate_ebv(solution, options);
                match (left, right) {
                    (Ok(false), _) | (_, Ok(false)) => Ok(Term::from(false)),
                    (Ok(true), Ok(true)) => Ok(Term::from(true)),
                    (Err(err), _) | (_, Err(err)) => Err(err),
                }
            }
            Expression::Or(left, right) => {
                let left = left.evaluate_ebv(solution, options);
                let right = right.evaluate_ebv(solution, options);
                match (left, right) {
                    (Ok(true), _) | (_, Ok(true)) => Ok(Term::from(true)),
                    (Ok(false), Ok(false)) => Ok(Term::from(false)),
                    (Err(err), _) | (_, Err(err)) => Err(err),
                }
            }
            Expression::Not(operand) => Ok(Term::from(!operand.evaluate_ebv(solution, options)?)),
            Expression::Bound(var) => Ok(Term::from(solution.is_bound(var))),
            Expression::Str(operand) => match operand.evaluate(solution, options)? {
                Term::Iri(iri) => Ok(Term::Literal(Literal::simple(iri.as_str()))),
                Term::Literal(lit) => Ok(Term::Literal(Literal::simple(lit.lexical()))),
                other => Err(EvalError::type_error("str", &[&other])),
            },
            Expression::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(solution, options))
                    .collect::<Result<Vec<_>, _>>()?;
                call(function, &args)
            }
            Expression::List(members) => {
                for member in members {
                    if !member.evaluate_ebv(solution, options)? {
                        return Ok(Term::from(false));
                    }
                }
                Ok(Term::from(true))
            }
        }
    }

    /// Evaluates and coerces the result to its effective boolean value.
    pub fn evaluate_ebv(
        &self,
        solution: &Solution,
        options: &ExecOptions,
    ) -> Result<bool, EvalError> {
        ebv(&self.evaluate(solution, options)?)
    }

    /// Members of an expression list, or the expression itself.
    pub fn conjuncts(&self) -> Vec<&Expression> {
        match self {
            Expression::List(members) => members.iter().collect(),
            other => vec![other],
        }
    }

    /// SPARQL surface form.
    pub fn to_sparql(&self) -> String {
        match self {
            Expression::Var(var) => var.to_sparql(),
            Expression::Term(term) => term.to_string(),
            Expression::Compare(op, left, right) => {
                let (left, right) = (left.to_sparql(), right.to_sparql());
                format!("({left} {} {right})", op.symbol())
            }
            Expression::Arith(op, left, right) => {
                let (left, right) = (left.to_sparql(), right.to_sparql());
                format!("({left} {} {right})", op.symbol())
            }
            Expression::Neg(operand) => format!("(-{})", operand.to_sparql()),
            Expression::And(left, right) => {
                format!("({} && {})", left.to_sparql(), right.to_sparql())
            }
            Expression::Or(left, right) => {
                format!("({} || {})", left.to_sparql(), right.to_sparql())
            }
            Expression::Not(operand) => format!("(!{})", operand.to_sparql()),
            Expression::Bound(var) => format!("BOUND({})", var.to_sparql()),
            Expression::Str(operand) => format!("STR({})", operand.to_sparql()),
            Expression::Call { function, args } => {
                let args = args.iter().map(Expression::to_sparql).collect::<Vec<_>>();
                format!("{function}({})", args.join(", "))
            }
            Expression::List(members) => {
                let members = members.iter().map(Expression::to_sparql).collect::<Vec<_>>();
                format!("({})", members.join(" && "))
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Var(var) => fmt::Display::fmt(var, f),
            Expression::Term(term) => fmt::Display::fmt(term, f),
            Expression::Compare(op, left, right) => write!(f, "({op} {left} {right})"),
            Expression::Arith(op, left, right) => write!(f, "({op} {left} {right})"),
            Expression::Neg(operand) => write!(f, "(- {operand})"),
            Expression::And(left, right) => write!(f, "(&& {left} {right})"),
            Expression::Or(left, right) => write!(f, "(|| {left} {right})"),
            Expression::Not(operand) => write!(f, "(! {operand})"),
            Expression::Bound(var) => write!(f, "(bound {var})"),
            Expression::Str(operand) => write!(f, "(str {operand})"),
            Expression::Call { function, args } => {
                write!(f, "({function}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Expression::List(members) => {
                f.write_str("(exprlist")?;
                for member in members {
                    write!(f, " {member}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Var> for Expression {
    fn from(value: Var) -> Self {
        Expression::Var(value)
    }
}

impl From<Term> for Expression {
    fn from(value: Term) -> Self {
        Expression::Term(value)
    }
}
