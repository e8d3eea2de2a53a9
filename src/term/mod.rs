//! RDF term model shared by patterns, solutions, and expression evaluation.
//!
//! Terms are compared structurally (same lexical form, datatype, and language
//! tag) by `Eq`/`Hash`; value-level comparison lives in
//! [`crate::expr::compare`] and works off [`Literal::native`].

mod datetime;
mod literal;

use std::fmt;

pub use datetime::{XsdDate, XsdDateTime};
pub use literal::{Literal, NativeValue};

pub(crate) use literal::{parse_decimal, parse_float};

/// XML Schema datatype IRIs understood by the value model.
pub mod xsd {
    /// `xsd:string`
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:boolean`
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:integer`
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:float`
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    /// `xsd:double`
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:dateTime`
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:date`
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    pub(crate) const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Integer subtypes that share the `xsd:integer` value space.
    pub(crate) const DERIVED_INTEGERS: &[&str] = &[
        "integer",
        "int",
        "long",
        "short",
        "byte",
        "nonNegativeInteger",
        "nonPositiveInteger",
        "positiveInteger",
        "negativeInteger",
        "unsignedLong",
        "unsignedInt",
        "unsignedShort",
        "unsignedByte",
    ];
}

/// RDF vocabulary IRIs.
pub mod rdf {
    /// `rdf:langString`, the datatype of language-tagged literals.
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// Absolute IRI reference.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    /// Wraps an IRI string without validation.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Blank node identified by its local label.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlankNode(String);

impl BlankNode {
    /// Creates a blank node with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the blank node label.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An RDF value: IRI, blank node, or literal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// IRI reference.
    Iri(Iri),
    /// Blank node.
    BlankNode(BlankNode),
    /// Literal value.
    Literal(Literal),
}

impl Term {
    /// Shorthand for an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(Iri::new(iri))
    }

    /// Shorthand for a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(BlankNode::new(label))
    }

    /// Returns the literal if this term is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for literal terms.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => fmt::Display::fmt(iri, f),
            Term::BlankNode(node) => fmt::Display::fmt(node, f),
            Term::Literal(lit) => fmt::Display::fmt(lit, f),
        }
    }
}

impl From<Iri> for Term {
    fn from(value: Iri) -> Self {
        Term::Iri(value)
    }
}

impl From<BlankNode> for Term {
    fn from(value: BlankNode) -> Self {
        Term::BlankNode(value)
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Literal(Literal::simple(value))
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Literal(Literal::simple(value))
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::Literal(Literal::boolean(value))
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Literal(Literal::integer(value))
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Literal(Literal::double(value))
    }
}
