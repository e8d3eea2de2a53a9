use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::datetime::{XsdDate, XsdDateTime};
use super::{rdf, xsd, Iri};

/// RDF literal: lexical form, datatype IRI, and optional language tag.
///
/// Simple literals carry `xsd:string`; language-tagged literals carry
/// `rdf:langString` and a lowercased tag.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    lexical: String,
    datatype: Iri,
    language: Option<String>,
}

/// Value-space view of a literal, derived from its lexical form and datatype.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue<'a> {
    /// `xsd:integer` or one of its derived types.
    Integer(i64),
    /// `xsd:decimal`, or an integer too large for `i64`.
    Decimal(BigDecimal),
    /// `xsd:float`, stored widened.
    Float(f64),
    /// `xsd:double`.
    Double(f64),
    /// `xsd:boolean`.
    Boolean(bool),
    /// Simple literal or `xsd:string`.
    String(&'a str),
    /// Language-tagged string.
    LangString {
        /// Lexical form.
        value: &'a str,
        /// Lowercased language tag.
        language: &'a str,
    },
    /// `xsd:dateTime`.
    DateTime(XsdDateTime),
    /// `xsd:date`.
    Date(XsdDate),
    /// Datatype outside the supported value space.
    Other,
    /// Lexical form is not valid for its (known) datatype.
    Invalid,
}

impl Literal {
    /// Simple literal (datatype `xsd:string`).
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, Iri::new(xsd::STRING))
    }

    /// Literal with an explicit datatype.
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Language-tagged literal. The tag is stored lowercased.
    pub fn lang(lexical: impl Into<String>, language: impl AsRef<str>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri::new(rdf::LANG_STRING),
            language: Some(language.as_ref().to_ascii_lowercase()),
        }
    }

    /// Canonical `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Iri::new(xsd::INTEGER))
    }

    /// Canonical `xsd:decimal` literal (plain notation, at least one
    /// fractional digit).
    pub fn decimal(value: BigDecimal) -> Self {
        Self::typed(decimal_lexical(&value), Iri::new(xsd::DECIMAL))
    }

    /// `xsd:double` literal.
    pub fn double(value: f64) -> Self {
        Self::typed(float_lexical(value), Iri::new(xsd::DOUBLE))
    }

    /// `xsd:float` literal; the value is narrowed to single precision.
    pub fn float(value: f64) -> Self {
        Self::typed(float_lexical((value as f32) as f64), Iri::new(xsd::FLOAT))
    }

    /// `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, Iri::new(xsd::BOOLEAN))
    }

    /// Lexical form.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Datatype IRI.
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// Language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// True for simple literals and `xsd:string` literals without a tag.
    pub fn is_simple(&self) -> bool {
        self.language.is_none() && self.datatype.as_str() == xsd::STRING
    }

    /// Derives the value-space view of this literal.
    pub fn native(&self) -> NativeValue<'_> {
        if let Some(language) = self.language.as_deref() {
            return NativeValue::LangString {
                value: &self.lexical,
                language,
            };
        }
        let Some(local) = self.datatype.as_str().strip_prefix(xsd::NAMESPACE) else {
            return NativeValue::Other;
        };
        let lexical = self.lexical.trim();
        match local {
            "string" => NativeValue::String(&self.lexical),
            "boolean" => match lexical {
                "true" | "1" => NativeValue::Boolean(true),
                "false" | "0" => NativeValue::Boolean(false),
                _ => NativeValue::Invalid,
            },
            "decimal" => parse_decimal(lexical)
                .map(NativeValue::Decimal)
                .unwrap_or(NativeValue::Invalid),
            "double" => parse_float(lexical)
                .map(NativeValue::Double)
                .unwrap_or(NativeValue::Invalid),
            "float" => parse_float(lexical)
                .map(|v| NativeValue::Float((v as f32) as f64))
                .unwrap_or(NativeValue::Invalid),
            "dateTime" => XsdDateTime::parse(lexical)
                .map(NativeValue::DateTime)
                .unwrap_or(NativeValue::Invalid),
            "date" => XsdDate::parse(lexical)
                .map(NativeValue::Date)
                .unwrap_or(NativeValue::Invalid),
            other if xsd::DERIVED_INTEGERS.contains(&other) => parse_integer(lexical),
            _ => NativeValue::Other,
        }
    }
}

fn parse_integer(lexical: &str) -> NativeValue<'static> {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return NativeValue::Invalid;
    }
    match lexical.parse::<i64>() {
        Ok(value) => NativeValue::Integer(value),
        Err(_) => BigDecimal::from_str(lexical)
            .map(NativeValue::Decimal)
            .unwrap_or(NativeValue::Invalid),
    }
}

pub(crate) fn parse_decimal(lexical: &str) -> Option<BigDecimal> {
    let unsigned = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for b in unsigned.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    BigDecimal::from_str(lexical).ok()
}

pub(crate) fn parse_float(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    let valid = lexical
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !valid || !lexical.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical.parse::<f64>().ok()
}

fn decimal_lexical(value: &BigDecimal) -> String {
    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    let digits = digits.to_string();
    let (sign, magnitude) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{sign}{magnitude}{zeros}.0");
    }
    let scale = scale as usize;
    if magnitude.len() > scale {
        let (int, frac) = magnitude.split_at(magnitude.len() - scale);
        format!("{sign}{int}.{frac}")
    } else {
        let zeros = "0".repeat(scale - magnitude.len());
        format!("{sign}0.{zeros}{magnitude}")
    }
}

fn float_lexical(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value == f64::INFINITY {
        "INF".to_owned()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_owned()
    } else {
        format!("{value:?}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, lexical: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in lexical.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(language) = &self.language {
            write_quoted(f, &self.lexical)?;
            return write!(f, "@{language}");
        }
        if self.is_simple() {
            return write_quoted(f, &self.lexical);
        }
        let bare = match self.datatype.as_str() {
            xsd::INTEGER => matches!(self.native(), NativeValue::Integer(_)),
            xsd::BOOLEAN => matches!(self.lexical.as_str(), "true" | "false"),
            xsd::DECIMAL => {
                self.lexical.contains('.')
                    && !self.lexical.ends_with('.')
                    && parse_decimal(&self.lexical).is_some()
            }
            _ => false,
        };
        if bare {
            return f.write_str(&self.lexical);
        }
        write_quoted(f, &self.lexical)?;
        write!(f, "^^{}", self.datatype)
    }
}
