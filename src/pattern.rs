//! Triple templates matched against a queryable.

use std::fmt;

use crate::solution::{Solution, Var};
use crate::term::{Iri, Literal, Term};

/// A concrete triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject term.
    pub subject: Term,
    /// Predicate term.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl Triple {
    /// Creates a triple from its three positions.
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// One position of a triple pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermPattern {
    /// Variable to bind.
    Var(Var),
    /// Fixed term that must match exactly.
    Term(Term),
}

impl TermPattern {
    fn extend(&self, term: &Term, solution: &mut Solution) -> bool {
        match self {
            TermPattern::Var(var) => solution.bind(var.clone(), term.clone()),
            TermPattern::Term(fixed) => fixed == term,
        }
    }

    fn sparql(&self) -> String {
        match self {
            TermPattern::Var(var) => var.to_sparql(),
            TermPattern::Term(term) => term.to_string(),
        }
    }
}

impl fmt::Display for TermPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermPattern::Var(var) => fmt::Display::fmt(var, f),
            TermPattern::Term(term) => fmt::Display::fmt(term, f),
        }
    }
}

impl From<Var> for TermPattern {
    fn from(value: Var) -> Self {
        TermPattern::Var(value)
    }
}

impl From<Term> for TermPattern {
    fn from(value: Term) -> Self {
        TermPattern::Term(value)
    }
}

impl From<Iri> for TermPattern {
    fn from(value: Iri) -> Self {
        TermPattern::Term(Term::Iri(value))
    }
}

impl From<Literal> for TermPattern {
    fn from(value: Literal) -> Self {
        TermPattern::Term(Term::Literal(value))
    }
}

/// Triple template whose positions are terms or variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    /// Subject position.
    pub subject: TermPattern,
    /// Predicate position.
    pub predicate: TermPattern,
    /// Object position.
    pub object: TermPattern,
}

impl TriplePattern {
    /// Creates a pattern from its three positions.
    pub fn new(
        subject: impl Into<TermPattern>,
        predicate: impl Into<TermPattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Variables in subject, predicate, object order (repeats included).
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|position| match position {
                TermPattern::Var(var) => Some(var),
                TermPattern::Term(_) => None,
            })
    }

    /// Matches `triple` from an empty solution.
    pub fn matches(&self, triple: &Triple) -> Option<Solution> {
        self.extend(triple, &Solution::new())
    }

    /// Extends `base` with the bindings needed for `triple` to match.
    ///
    /// A variable repeated across positions, or already bound in `base`, must
    /// bind to the same term everywhere.
    pub fn extend(&self, triple: &Triple, base: &Solution) -> Option<Solution> {
        let mut solution = base.clone();
        let matched = self.subject.extend(&triple.subject, &mut solution)
            && self.predicate.extend(&triple.predicate, &mut solution)
            && self.object.extend(&triple.object, &mut solution);
        matched.then_some(solution)
    }

    /// SPARQL triple syntax, without the trailing dot.
    pub fn to_sparql(&self) -> String {
        format!(
            "{} {} {}",
            self.subject.sparql(),
            self.predicate.sparql(),
            self.object.sparql()
        )
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            subject,
            predicate,
            object,
        } = self;
        write!(f, "(triple {subject} {predicate} {object})")
    }
}

/// Graph scope of a pattern match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphContext {
    /// The default (unnamed) graph only.
    #[default]
    Default,
    /// A single named graph.
    Named(Iri),
    /// Every graph, default included.
    Any,
}
