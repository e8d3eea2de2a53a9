//! Pattern-matching capability consumed by basic graph patterns.

use tracing::trace;

use crate::error::Result;
use crate::pattern::{GraphContext, Triple, TriplePattern};
use crate::solution::{Solution, SolutionSequence};
use crate::term::Iri;

/// A read-only source of triples that can match patterns jointly.
pub trait Queryable {
    /// Returns every solution that satisfies all `patterns` within `graph`.
    ///
    /// An empty pattern list yields a single empty solution.
    fn match_patterns(
        &self,
        patterns: &[TriplePattern],
        graph: &GraphContext,
    ) -> Result<SolutionSequence>;
}

impl<Q: Queryable + ?Sized> Queryable for &Q {
    fn match_patterns(
        &self,
        patterns: &[TriplePattern],
        graph: &GraphContext,
    ) -> Result<SolutionSequence> {
        (**self).match_patterns(patterns, graph)
    }
}

/// A triple placed in the default graph (`graph == None`) or a named graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    /// The triple itself.
    pub triple: Triple,
    /// Named graph, if any.
    pub graph: Option<Iri>,
}

impl Quad {
    fn in_scope(&self, context: &GraphContext) -> bool {
        match (context, &self.graph) {
            (GraphContext::Any, _) => true,
            (GraphContext::Default, None) => true,
            (GraphContext::Named(name), Some(graph)) => name == graph,
            _ => false,
        }
    }
}

/// In-memory quad list matched by nested loops, one pattern at a time.
///
/// Solutions come out in pattern order, then quad insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    quads: Vec<Quad>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the default graph. Duplicates are kept.
    pub fn insert(&mut self, triple: Triple) {
        self.quads.push(Quad {
            triple,
            graph: None,
        });
    }

    /// Adds a triple to the named graph `graph`.
    pub fn insert_named(&mut self, graph: Iri, triple: Triple) {
        self.quads.push(Quad {
            triple,
            graph: Some(graph),
        });
    }

    /// Number of stored quads.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// True when nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl FromIterator<Triple> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = MemoryStore::new();
        for triple in iter {
            store.insert(triple);
        }
        store
    }
}

impl Queryable for MemoryStore {
    fn match_patterns(
        &self,
        patterns: &[TriplePattern],
        graph: &GraphContext,
    ) -> Result<SolutionSequence> {
        let mut partial = vec![Solution::new()];
        for pattern in patterns {
            let mut next = Vec::new();
            for base in &partial {
                for quad in self.quads.iter().filter(|quad| quad.in_scope(graph)) {
                    if let Some(solution) = pattern.extend(&quad.triple, base) {
                        next.push(solution);
                    }
                }
            }
            trace!(
                pattern = %pattern,
                matches = next.len(),
                "sparql.store.match"
            );
            partial = next;
            if partial.is_empty() {
                break;
            }
        }
        Ok(partial.into())
    }
}
