//! Typed value comparison for the relational operators and ORDER BY.
//!
//! [`compare`] is the three-way comparator. It is defined between two
//! numerics (after promotion), two booleans, two plain strings, two strings
//! with the same language tag, two `xsd:dateTime` values, or two `xsd:date`
//! values. Any other pairing is a type error.

use std::cmp::Ordering;
use std::fmt;

use crate::error::EvalError;
use crate::term::{Literal, NativeValue, Term};

use super::numeric::Numeric;

/// Relational operators built on [`compare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Three-way comparison yielding the integer -1, 0, or 1.
    Cmp,
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Operator symbol in SSE and SPARQL.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Cmp => "<=>",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Applies the operator, producing a boolean literal (or an integer
    /// literal for [`CompareOp::Cmp`]).
    pub fn apply(self, left: &Term, right: &Term) -> Result<Term, EvalError> {
        match self {
            CompareOp::Cmp => {
                let value = match compare(left, right)? {
                    Ordering::Less => -1,
                    Ordering::Equal => 0,
                    Ordering::Greater => 1,
                };
                Ok(Term::Literal(Literal::integer(value)))
            }
            CompareOp::Eq => term_equal(left, right).map(Term::from),
            CompareOp::Ne => term_equal(left, right).map(|equal| Term::from(!equal)),
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                let holds = match value_order(self.symbol(), left, right)? {
                    // NaN is unordered against everything.
                    None => false,
                    Some(ordering) => match self {
                        CompareOp::Lt => ordering == Ordering::Less,
                        CompareOp::Le => ordering != Ordering::Greater,
                        CompareOp::Gt => ordering == Ordering::Greater,
                        _ => ordering != Ordering::Less,
                    },
                };
                Ok(Term::from(holds))
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Three-way comparison of two terms by value.
///
/// Fails with a type error when the terms are not mutually comparable, when
/// a date/time comparison is indeterminate, or when either side is NaN.
pub fn compare(left: &Term, right: &Term) -> Result<Ordering, EvalError> {
    value_order("<=>", left, right)?
        .ok_or_else(|| EvalError::type_error("<=>", &[left, right]))
}

/// Value equality with fallback to RDF term equality.
///
/// When value comparison is a type error, identical terms are equal and a
/// pair involving a non-literal is unequal; two different literals remain a
/// type error.
pub fn term_equal(left: &Term, right: &Term) -> Result<bool, EvalError> {
    match value_order("=", left, right) {
        Ok(ordering) => Ok(ordering == Some(Ordering::Equal)),
        Err(_) if left == right => Ok(true),
        Err(err) if left.is_literal() && right.is_literal() => Err(err),
        Err(_) => Ok(false),
    }
}

/// Total ordering used by ORDER BY.
///
/// Unbound (`None`) sorts first, then blank nodes, IRIs, and literals. Blank
/// nodes compare by label, IRIs by codepoint, literals through [`compare`]
/// with a failed comparison treated as a tie.
pub fn compare_for_order(left: Option<&Term>, right: Option<&Term>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Term::BlankNode(x), Term::BlankNode(y)) => x.label().cmp(y.label()),
            (Term::Iri(x), Term::Iri(y)) => x.as_str().cmp(y.as_str()),
            (Term::Literal(_), Term::Literal(_)) => compare(a, b).unwrap_or(Ordering::Equal),
            _ => kind_rank(a).cmp(&kind_rank(b)),
        },
    }
}

fn kind_rank(term: &Term) -> u8 {
    match term {
        Term::BlankNode(_) => 0,
        Term::Iri(_) => 1,
        Term::Literal(_) => 2,
    }
}

/// `Ok(None)` marks an unordered pair (NaN involved).
fn value_order(op: &'static str, left: &Term, right: &Term) -> Result<Option<Ordering>, EvalError> {
    let type_error = || EvalError::type_error(op, &[left, right]);
    let (Term::Literal(l), Term::Literal(r)) = (left, right) else {
        return Err(type_error());
    };
    let (a, b) = (l.native(), r.native());
    if let (Some(x), Some(y)) = (Numeric::from_native(&a), Numeric::from_native(&b)) {
        return Ok(x.partial_cmp_value(&y));
    }
    match (&a, &b) {
        (NativeValue::Boolean(x), NativeValue::Boolean(y)) => Ok(Some(x.cmp(y))),
        (NativeValue::String(x), NativeValue::String(y)) => Ok(Some(x.cmp(y))),
        (
            NativeValue::LangString { value: x, language: lx },
            NativeValue::LangString { value: y, language: ly },
        ) if lx == ly => Ok(Some(x.cmp(y))),
        (NativeValue::DateTime(x), NativeValue::DateTime(y)) => {
            x.compare(y).map(Some).ok_or_else(type_error)
        }
        (NativeValue::Date(x), NativeValue::Date(y)) => {
            x.compare(y).map(Some).ok_or_else(type_error)
        }
        _ => Err(type_error()),
    }
}
