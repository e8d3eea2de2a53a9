//! XSD constructor casts callable as `xsd:integer(?x)` and friends.

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::error::EvalError;
use crate::term::{parse_decimal, parse_float, xsd, Iri, Literal, NativeValue, Term};

use super::numeric::Numeric;

/// Invokes the function named by `function` on evaluated `args`.
pub fn call(function: &Iri, args: &[Term]) -> Result<Term, EvalError> {
    let target = match function.as_str() {
        xsd::INTEGER => xsd::INTEGER,
        xsd::DECIMAL => xsd::DECIMAL,
        xsd::FLOAT => xsd::FLOAT,
        xsd::DOUBLE => xsd::DOUBLE,
        xsd::STRING => xsd::STRING,
        xsd::BOOLEAN => xsd::BOOLEAN,
        other => {
            return Err(EvalError::UnknownFunction {
                iri: other.to_owned(),
            })
        }
    };
    let [arg] = args else {
        return Err(EvalError::Arity {
            function: function.to_string(),
            expected: 1,
            found: args.len(),
        });
    };
    cast(arg, target).map(Term::Literal)
}

fn cast(term: &Term, target: &'static str) -> Result<Literal, EvalError> {
    let literal = match term {
        Term::Literal(literal) => literal,
        Term::Iri(iri) if target == xsd::STRING => return Ok(Literal::simple(iri.as_str())),
        _ => return Err(EvalError::type_error(cast_name(target), &[term])),
    };
    let invalid = || EvalError::InvalidLexical {
        lexical: literal.lexical().to_owned(),
        datatype: target.to_owned(),
    };
    let native = literal.native();
    match native {
        NativeValue::Invalid => return Err(invalid()),
        NativeValue::LangString { .. } | NativeValue::Other if target != xsd::STRING => {
            return Err(EvalError::type_error(cast_name(target), &[term]))
        }
        NativeValue::DateTime(_) | NativeValue::Date(_) if target != xsd::STRING => {
            return Err(EvalError::type_error(cast_name(target), &[term]))
        }
        _ => {}
    }
    let lexical = literal.lexical().trim();
    match target {
        xsd::STRING => Ok(Literal::simple(literal.lexical())),
        xsd::BOOLEAN => match native {
            NativeValue::Boolean(value) => Ok(Literal::boolean(value)),
            NativeValue::String(_) => match lexical {
                "true" | "1" => Ok(Literal::boolean(true)),
                "false" | "0" => Ok(Literal::boolean(false)),
                _ => Err(invalid()),
            },
            other => {
                let number = Numeric::from_native(&other).ok_or_else(invalid)?;
                Ok(Literal::boolean(!number.is_zero_or_nan()))
            }
        },
        xsd::INTEGER => match native {
            NativeValue::Boolean(value) => Ok(Literal::integer(i64::from(value))),
            NativeValue::Integer(value) => Ok(Literal::integer(value)),
            NativeValue::Decimal(value) => Ok(integer_literal(&value)),
            NativeValue::Float(value) | NativeValue::Double(value) => {
                if !value.is_finite() {
                    return Err(invalid());
                }
                let truncated = value.trunc();
                match BigDecimal::from_f64(truncated) {
                    Some(dec) => Ok(integer_literal(&dec)),
                    None => Err(invalid()),
                }
            }
            _ => match Literal::typed(lexical, Iri::new(xsd::INTEGER)).native() {
                NativeValue::Integer(value) => Ok(Literal::integer(value)),
                NativeValue::Decimal(value) => Ok(integer_literal(&value)),
                _ => Err(invalid()),
            },
        },
        xsd::DECIMAL => match native {
            NativeValue::Boolean(value) => Ok(Literal::decimal(BigDecimal::from(i64::from(value)))),
            NativeValue::Integer(value) => Ok(Literal::decimal(BigDecimal::from(value))),
            NativeValue::Decimal(value) => Ok(Literal::decimal(value)),
            NativeValue::Float(value) | NativeValue::Double(value) => BigDecimal::from_f64(value)
                .map(Literal::decimal)
                .ok_or_else(invalid),
            _ => parse_decimal(lexical)
                .map(Literal::decimal)
                .ok_or_else(invalid),
        },
        xsd::FLOAT => float_source(&native, lexical)
            .map(Literal::float)
            .ok_or_else(invalid),
        _ => float_source(&native, lexical)
            .map(Literal::double)
            .ok_or_else(invalid),
    }
}

fn float_source(native: &NativeValue<'_>, lexical: &str) -> Option<f64> {
    match native {
        NativeValue::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
        NativeValue::Integer(value) => Some(*value as f64),
        NativeValue::Decimal(value) => value.to_f64(),
        NativeValue::Float(value) | NativeValue::Double(value) => Some(*value),
        _ => parse_float(lexical),
    }
}

fn integer_literal(value: &BigDecimal) -> Literal {
    let truncated = value.with_scale(0);
    match truncated.to_i64() {
        Some(value) => Literal::integer(value),
        None => {
            let (digits, _) = truncated.as_bigint_and_exponent();
            Literal::typed(digits.to_string(), Iri::new(xsd::INTEGER))
        }
    }
}

fn cast_name(target: &str) -> &'static str {
    match target {
        xsd::INTEGER => "xsd:integer",
        xsd::DECIMAL => "xsd:decimal",
        xsd::FLOAT => "xsd:float",
        xsd::DOUBLE => "xsd:double",
        xsd::BOOLEAN => "xsd:boolean",
        _ => "xsd:string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast_to(target: &str, arg: Term) -> Result<Term, EvalError> {
        call(&Iri::new(target), &[arg])
    }

    #[test]
    fn integer_cast_truncates() -> Result<(), EvalError> {
        assert_eq!(cast_to(xsd::INTEGER, Term::from(2.9))?, Term::from(2i64));
        assert_eq!(cast_to(xsd::INTEGER, Term::from(-2.9))?, Term::from(-2i64));
        let padded = Term::from(" 42 ");
        assert_eq!(cast_to(xsd::INTEGER, padded)?, Term::from(42i64));
        assert_eq!(cast_to(xsd::INTEGER, Term::from(true))?, Term::from(1i64));
        Ok(())
    }

    #[test]
    fn invalid_lexical_is_reported() {
        let err = cast_to(xsd::INTEGER, Term::from("forty"));
        assert!(matches!(err, Err(EvalError::InvalidLexical { .. })));
        assert!(cast_to(xsd::INTEGER, Term::from(f64::INFINITY)).is_err());
    }

    #[test]
    fn string_cast_accepts_iris_and_literals() -> Result<(), EvalError> {
        assert_eq!(
            cast_to(xsd::STRING, Term::iri("http://example/a"))?,
            Term::from("http://example/a")
        );
        assert_eq!(cast_to(xsd::STRING, Term::from(7i64))?, Term::from("7"));
        assert!(cast_to(xsd::STRING, Term::blank("b")).is_err());
        Ok(())
    }

    #[test]
    fn boolean_and_float_casts() -> Result<(), EvalError> {
        assert_eq!(cast_to(xsd::BOOLEAN, Term::from(0i64))?, Term::from(false));
        assert_eq!(cast_to(xsd::BOOLEAN, Term::from("1"))?, Term::from(true));
        assert_eq!(cast_to(xsd::DOUBLE, Term::from("1.5e0"))?, Term::from(1.5));
        assert_eq!(
            cast_to(xsd::DECIMAL, Term::from(3i64))?,
            Term::Literal(Literal::decimal(BigDecimal::from(3)))
        );
        Ok(())
    }

    #[test]
    fn unknown_function_and_arity() {
        let unknown = call(&Iri::new("http://example/f"), &[Term::from(1i64)]);
        assert!(matches!(unknown, Err(EvalError::UnknownFunction { .. })));
        let arity = call(&Iri::new(xsd::INTEGER), &[]);
        assert!(matches!(
            arity,
            Err(EvalError::Arity { expected: 1, found: 0, .. })
        ));
    }
}
