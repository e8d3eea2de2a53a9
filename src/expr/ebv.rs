use crate::error::EvalError;
use crate::term::{NativeValue, Term};

use super::numeric::Numeric;

/// Effective boolean value of `term`.
///
/// Booleans pass through; numerics are true unless zero or NaN; strings
/// (simple, `xsd:string`, or language-tagged) are true unless empty. A
/// boolean or numeric literal with an invalid lexical form is false.
/// Anything else, including IRIs and blank nodes, is a type error.
pub fn ebv(term: &Term) -> Result<bool, EvalError> {
    let Term::Literal(literal) = term else {
        return Err(EvalError::type_error("ebv", &[term]));
    };
    match literal.native() {
        NativeValue::Boolean(value) => Ok(value),
        NativeValue::String(value) | NativeValue::LangString { value, .. } => Ok(!value.is_empty()),
        NativeValue::Invalid => Ok(false),
        native => match Numeric::from_native(&native) {
            Some(number) => Ok(!number.is_zero_or_nan()),
            None => Err(EvalError::type_error("ebv", &[term])),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{xsd, Iri, Literal};

    #[test]
    fn booleans_pass_through() -> Result<(), EvalError> {
        assert!(ebv(&Term::from(true))?);
        assert!(!ebv(&Term::from(false))?);
        Ok(())
    }

    #[test]
    fn numerics_are_false_only_when_zero_or_nan() -> Result<(), EvalError> {
        assert!(ebv(&Term::from(3i64))?);
        assert!(!ebv(&Term::from(0i64))?);
        assert!(!ebv(&Term::from(f64::NAN))?);
        let zero = Literal::typed("0.0", Iri::new(xsd::DECIMAL));
        assert!(!ebv(&Term::Literal(zero))?);
        Ok(())
    }

    #[test]
    fn strings_are_false_only_when_empty() -> Result<(), EvalError> {
        assert!(ebv(&Term::from("x"))?);
        assert!(!ebv(&Term::from(""))?);
        assert!(ebv(&Term::Literal(Literal::lang("chat", "fr")))?);
        Ok(())
    }

    #[test]
    fn invalid_lexicals_are_false() -> Result<(), EvalError> {
        let maybe = Literal::typed("maybe", Iri::new(xsd::BOOLEAN));
        assert!(!ebv(&Term::Literal(maybe))?);
        let garbled = Literal::typed("x1", Iri::new(xsd::INTEGER));
        assert!(!ebv(&Term::Literal(garbled))?);
        Ok(())
    }

    #[test]
    fn other_terms_are_type_errors() {
        assert!(ebv(&Term::iri("http://example/a")).is_err());
        assert!(ebv(&Term::blank("b0")).is_err());
        let date = Term::Literal(Literal::typed("2020-01-01", Iri::new(xsd::DATE)));
        assert!(matches!(ebv(&date), Err(ref e) if e.is_type_error()));
    }
}
