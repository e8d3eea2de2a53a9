//! Numeric promotion and arithmetic over the xsd numeric ladder.

use std::cmp::Ordering;
use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::error::EvalError;
use crate::term::{Literal, NativeValue, Term};

/// A numeric literal value, ranked integer < decimal < float < double.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Numeric {
    Integer(i64),
    Decimal(BigDecimal),
    Float(f64),
    Double(f64),
}

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl ArithOp {
    /// Operator symbol in SSE and SPARQL.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Applies the operator to two numeric terms.
    pub fn apply(self, left: &Term, right: &Term) -> Result<Term, EvalError> {
        let (Some(l), Some(r)) = (Numeric::from_term(left), Numeric::from_term(right)) else {
            return Err(EvalError::type_error(self.symbol(), &[left, right]));
        };
        Ok(Term::Literal(l.arith(self, r)?.into_literal()))
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Numeric {
    pub(crate) fn from_native(value: &NativeValue<'_>) -> Option<Self> {
        match value {
            NativeValue::Integer(v) => Some(Numeric::Integer(*v)),
            NativeValue::Decimal(v) => Some(Numeric::Decimal(v.clone())),
            NativeValue::Float(v) => Some(Numeric::Float(*v)),
            NativeValue::Double(v) => Some(Numeric::Double(*v)),
            _ => None,
        }
    }

    pub(crate) fn from_term(term: &Term) -> Option<Self> {
        Self::from_native(&term.as_literal()?.native())
    }

    fn rank(&self) -> u8 {
        match self {
            Numeric::Integer(_) => 0,
            Numeric::Decimal(_) => 1,
            Numeric::Float(_) => 2,
            Numeric::Double(_) => 3,
        }
    }

    fn to_f64(&self) -> f64 {
        match self {
            Numeric::Integer(v) => *v as f64,
            Numeric::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Numeric::Float(v) | Numeric::Double(v) => *v,
        }
    }

    /// Widens `self` to `rank`, never narrowing.
    fn promote(self, rank: u8) -> Self {
        if self.rank() >= rank {
            return self;
        }
        match rank {
            1 => match self.exact() {
                Some(dec) => Numeric::Decimal(dec),
                None => self,
            },
            2 => Numeric::Float(self.to_f64()),
            _ => Numeric::Double(self.to_f64()),
        }
    }

    fn promote_pair(self, other: Self) -> (Self, Self) {
        let rank = self.rank().max(other.rank());
        (self.promote(rank), other.promote(rank))
    }

    /// Value comparison; `None` when either side is NaN.
    ///
    /// Integers and decimals compare exactly, with each other and with
    /// finite floats. Infinities order beyond every finite value.
    pub(crate) fn partial_cmp_value(&self, other: &Self) -> Option<Ordering> {
        if let (Numeric::Integer(a), Numeric::Integer(b)) = (self, other) {
            return Some(a.cmp(b));
        }
        if self.is_nan() || other.is_nan() {
            return None;
        }
        if self.is_float() && other.is_float() {
            return self.to_f64().partial_cmp(&other.to_f64());
        }
        match (self.exact(), other.exact()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            (None, _) => self.to_f64().partial_cmp(&0.0),
            (_, None) => 0.0_f64.partial_cmp(&other.to_f64()),
        }
    }

    fn is_float(&self) -> bool {
        matches!(self, Numeric::Float(_) | Numeric::Double(_))
    }

    fn is_nan(&self) -> bool {
        match self {
            Numeric::Float(v) | Numeric::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Exact value; `None` for infinities.
    fn exact(&self) -> Option<BigDecimal> {
        match self {
            Numeric::Integer(v) => Some(BigDecimal::from(*v)),
            Numeric::Decimal(v) => Some(v.clone()),
            Numeric::Float(v) | Numeric::Double(v) => BigDecimal::from_f64(*v),
        }
    }

    pub(crate) fn arith(self, op: ArithOp, other: Self) -> Result<Self, EvalError> {
        match self.promote_pair(other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => integer_arith(op, a, b),
            (Numeric::Decimal(a), Numeric::Decimal(b)) => decimal_arith(op, a, b),
            (Numeric::Float(a), Numeric::Float(b)) => {
                Ok(Numeric::Float((float_arith(op, a, b) as f32) as f64))
            }
            (a, b) => Ok(Numeric::Double(float_arith(op, a.to_f64(), b.to_f64()))),
        }
    }

    pub(crate) fn negate(self) -> Self {
        match self {
            Numeric::Integer(v) => match v.checked_neg() {
                Some(n) => Numeric::Integer(n),
                None => Numeric::Decimal(-BigDecimal::from(v)),
            },
            Numeric::Decimal(v) => Numeric::Decimal(-v),
            Numeric::Float(v) => Numeric::Float(-v),
            Numeric::Double(v) => Numeric::Double(-v),
        }
    }

    pub(crate) fn is_zero_or_nan(&self) -> bool {
        match self {
            Numeric::Integer(v) => *v == 0,
            Numeric::Decimal(v) => v.is_zero(),
            Numeric::Float(v) | Numeric::Double(v) => *v == 0.0 || v.is_nan(),
        }
    }

    pub(crate) fn into_literal(self) -> Literal {
        match self {
            Numeric::Integer(v) => Literal::integer(v),
            Numeric::Decimal(v) => Literal::decimal(v),
            Numeric::Float(v) => Literal::float(v),
            Numeric::Double(v) => Literal::double(v),
        }
    }
}

fn integer_arith(op: ArithOp, a: i64, b: i64) -> Result<Numeric, EvalError> {
    let checked = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => return decimal_arith(op, BigDecimal::from(a), BigDecimal::from(b)),
    };
    match checked {
        Some(value) => Ok(Numeric::Integer(value)),
        None => decimal_arith(op, BigDecimal::from(a), BigDecimal::from(b)),
    }
}

fn decimal_arith(op: ArithOp, a: BigDecimal, b: BigDecimal) -> Result<Numeric, EvalError> {
    let value = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
    };
    Ok(Numeric::Decimal(value))
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
    }
}
