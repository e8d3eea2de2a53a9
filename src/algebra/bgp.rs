use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::options::ExecOptions;
use crate::pattern::{GraphContext, TriplePattern};
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::queryable::Queryable;
use crate::solution::{SolutionSequence, Var};
use crate::term::Iri;

/// Conjunction of triple patterns matched in one graph.
///
/// A basic graph pattern built with [`GraphPattern::new`] targets the default
/// graph only; [`GraphPattern::in_graph`] scopes the same patterns to a named
/// graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphPattern {
    patterns: Vec<TriplePattern>,
    graph: Option<Iri>,
}

impl GraphPattern {
    /// Patterns matched against the default graph.
    pub fn new(patterns: Vec<TriplePattern>) -> Self {
        Self {
            patterns,
            graph: None,
        }
    }

    /// Patterns matched inside the named graph `graph`.
    pub fn in_graph(graph: Iri, patterns: Vec<TriplePattern>) -> Self {
        Self {
            patterns,
            graph: Some(graph),
        }
    }

    /// The triple patterns.
    pub fn patterns(&self) -> &[TriplePattern] {
        &self.patterns
    }

    /// Named graph, or `None` for the default graph.
    pub fn graph(&self) -> Option<&Iri> {
        self.graph.as_ref()
    }

    /// Graph scope handed to the queryable.
    pub fn context(&self) -> GraphContext {
        match &self.graph {
            Some(graph) => GraphContext::Named(graph.clone()),
            None => GraphContext::Default,
        }
    }

    pub(crate) fn collect_blank_vars(&self, out: &mut BTreeSet<Var>) {
        for pattern in &self.patterns {
            let hidden = pattern.vars().filter(|var| !var.is_distinguished());
            out.extend(hidden.cloned());
        }
    }

    /// Group graph pattern body, e.g. `?s <p> ?o .` or `GRAPH <g> { … }`.
    pub(crate) fn sparql_body(&self) -> String {
        let triples = self
            .patterns
            .iter()
            .map(|pattern| format!("{} .", pattern.to_sparql()))
            .collect::<Vec<_>>()
            .join(" ");
        match &self.graph {
            Some(graph) => format!("GRAPH {graph} {{ {triples} }}"),
            None => triples,
        }
    }
}

impl fmt::Display for GraphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(graph) = &self.graph {
            write!(f, "(graph {graph} ")?;
        }
        f.write_str("(bgp")?;
        for pattern in &self.patterns {
            write!(f, " {pattern}")?;
        }
        f.write_str(")")?;
        if self.graph.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

pub(super) fn execute(
    pattern: &GraphPattern,
    queryable: &dyn Queryable,
    options: &ExecOptions,
) -> Result<SolutionSequence> {
    let start = profile_timer();
    let solutions = queryable.match_patterns(&pattern.patterns, &pattern.context())?;
    record_profile_timer(ProfileKind::Bgp, start);
    debug!(
        depth = options.depth,
        patterns = pattern.patterns.len(),
        solutions = solutions.len(),
        "sparql.bgp.execute"
    );
    Ok(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Triple;
    use crate::queryable::MemoryStore;
    use crate::term::Term;

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://example/{local}"))
    }

    #[test]
    fn default_graph_only() -> Result<()> {
        let mut store = MemoryStore::new();
        let graph = Iri::new("http://example/g");
        store.insert(Triple::new(ex("x"), ex("p"), 1i64));
        store.insert_named(graph.clone(), Triple::new(ex("y"), ex("p"), 2i64));
        let patterns = vec![TriplePattern::new(Var::new("s"), ex("p"), Var::new("o"))];

        let bgp = GraphPattern::new(patterns.clone());
        let result = execute(&bgp, &store, &ExecOptions::default())?;
        assert_eq!(result.len(), 1);
        assert_eq!(result.as_slice()[0].get(&Var::new("s")), Some(&ex("x")));

        let named = GraphPattern::in_graph(graph, patterns);
        let result = execute(&named, &store, &ExecOptions::default())?;
        assert_eq!(result.as_slice()[0].get(&Var::new("s")), Some(&ex("y")));
        Ok(())
    }

    #[test]
    fn renders_sse_and_sparql() {
        let bgp = GraphPattern::in_graph(
            Iri::new("http://example/g"),
            vec![TriplePattern::new(Var::new("s"), ex("p"), Var::new("o"))],
        );
        assert_eq!(
            bgp.to_string(),
            "(graph <http://example/g> (bgp (triple ?s <http://example/p> ?o)))"
        );
        assert_eq!(
            bgp.sparql_body(),
            "GRAPH <http://example/g> { ?s <http://example/p> ?o . }"
        );
    }
}
