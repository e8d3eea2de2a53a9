//! Variable bindings and ordered solution sequences.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::term::Term;

/// Query variable.
///
/// Non-distinguished variables (`??x`) stand in for blank nodes of a basic
/// graph pattern; their scope ends at that pattern.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var {
    name: String,
    distinguished: bool,
}

impl Var {
    /// Creates a distinguished variable (`?name`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinguished: true,
        }
    }

    /// Creates a non-distinguished variable (`??name`).
    pub fn nondistinguished(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distinguished: false,
        }
    }

    /// Variable name without sigils.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the variable may appear in query results.
    pub fn is_distinguished(&self) -> bool {
        self.distinguished
    }

    /// SPARQL surface form; non-distinguished variables become blank nodes.
    pub fn to_sparql(&self) -> String {
        if self.distinguished {
            format!("?{}", self.name)
        } else {
            format!("_:{}", self.name)
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distinguished {
            write!(f, "?{}", self.name)
        } else {
            write!(f, "??{}", self.name)
        }
    }
}

/// Partial mapping from variables to terms.
///
/// A variable is bound at most once; [`Solution::bind`] refuses to replace an
/// existing binding with a different term.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Solution {
    bindings: BTreeMap<Var, Term>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the binding for `var`.
    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Returns true when `var` is bound.
    pub fn is_bound(&self, var: &Var) -> bool {
        self.bindings.contains_key(var)
    }

    /// Binds `var` to `term`.
    ///
    /// Returns `false` (leaving the solution unchanged) when `var` is already
    /// bound to a different term.
    pub fn bind(&mut self, var: Var, term: Term) -> bool {
        match self.bindings.get(&var) {
            Some(existing) => *existing == term,
            None => {
                self.bindings.insert(var, term);
                true
            }
        }
    }

    /// Builder form of [`Solution::bind`]; `None` on conflict.
    pub fn with(mut self, var: Var, term: impl Into<Term>) -> Option<Self> {
        self.bind(var, term.into()).then_some(self)
    }

    /// Union of two solutions, or `None` if they disagree on a shared variable.
    pub fn merge(&self, other: &Solution) -> Option<Solution> {
        let mut merged = self.clone();
        for (var, term) in &other.bindings {
            if !merged.bind(var.clone(), term.clone()) {
                return None;
            }
        }
        Some(merged)
    }

    /// Restricts the solution to `vars`.
    pub fn project(&self, vars: &[Var]) -> Solution {
        let bindings = self
            .bindings
            .iter()
            .filter(|(var, _)| vars.contains(var))
            .map(|(var, term)| (var.clone(), term.clone()))
            .collect();
        Solution { bindings }
    }

    /// Bound variables in order.
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.bindings.keys()
    }

    /// Iterates over bindings in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(Var, Term)> for Solution {
    /// Later bindings that conflict with an earlier one are dropped.
    fn from_iter<I: IntoIterator<Item = (Var, Term)>>(iter: I) -> Self {
        let mut solution = Solution::new();
        for (var, term) in iter {
            solution.bind(var, term);
        }
        solution
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (var, term)) in self.bindings.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var}: {term}")?;
        }
        f.write_str("}")
    }
}

/// Ordered collection of solutions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionSequence {
    solutions: Vec<Solution>,
}

impl SolutionSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// True when the sequence holds no solutions.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Iterates over the solutions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.solutions.iter()
    }

    /// Borrows the solutions as a slice.
    pub fn as_slice(&self) -> &[Solution] {
        &self.solutions
    }

    /// Consumes the sequence, returning the underlying vector.
    pub fn into_vec(self) -> Vec<Solution> {
        self.solutions
    }

    /// Drops every solution equal to its immediate predecessor.
    pub fn reduced(mut self) -> Self {
        self.solutions.dedup();
        self
    }

    /// Drops every repeated solution, keeping first occurrences in order.
    pub fn distinct(self) -> Self {
        let mut seen = BTreeSet::new();
        self.solutions
            .into_iter()
            .filter(|solution| seen.insert(solution.clone()))
            .collect()
    }

    /// Stable sort by `compare`.
    ///
    /// `compare` need not be a total order; inconsistent answers only affect
    /// the relative position of the solutions involved.
    pub fn sort_by<F>(self, mut compare: F) -> Self
    where
        F: FnMut(&Solution, &Solution) -> Ordering,
    {
        stable_sort_by(self.solutions, &mut compare).into()
    }
}

/// Top-down merge sort; ties keep their input order.
pub(crate) fn stable_sort_by<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = stable_sort_by(items, compare);
    let right = stable_sort_by(right, compare);
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => {
                if compare(r, l) == Ordering::Less {
                    merged.extend(right.next());
                } else {
                    merged.extend(left.next());
                }
            }
            (Some(_), None) => {
                merged.extend(left);
                break;
            }
            (None, _) => {
                merged.extend(right);
                break;
            }
        }
    }
    merged
}

impl From<Vec<Solution>> for SolutionSequence {
    fn from(solutions: Vec<Solution>) -> Self {
        Self { solutions }
    }
}

impl FromIterator<Solution> for SolutionSequence {
    fn from_iter<I: IntoIterator<Item = Solution>>(iter: I) -> Self {
        Self {
            solutions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SolutionSequence {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSequence {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sol(value: i64) -> Solution {
        Solution::new()
            .with(Var::new("o"), value)
            .expect("fresh binding")
    }

    #[test]
    fn bind_refuses_conflicting_terms() {
        let mut solution = Solution::new();
        assert!(solution.bind(Var::new("x"), Term::from(1i64)));
        assert!(solution.bind(Var::new("x"), Term::from(1i64)));
        assert!(!solution.bind(Var::new("x"), Term::from(2i64)));
        assert_eq!(solution.get(&Var::new("x")), Some(&Term::from(1i64)));
    }

    #[test]
    fn merge_requires_compatible_bindings() {
        let left = sol(1).with(Var::new("s"), Term::iri("http://example/a"));
        let left = left.expect("binding");
        let right = sol(1).with(Var::new("p"), Term::iri("http://example/p"));
        let merged = left.merge(&right.expect("binding")).expect("compatible");
        assert_eq!(merged.len(), 3);
        assert!(left.merge(&sol(2)).is_none());
    }

    #[test]
    fn reduced_only_drops_adjacent_repeats() {
        let seq: SolutionSequence = vec![sol(1), sol(1), sol(2), sol(1)].into();
        assert_eq!(seq.reduced().into_vec(), vec![sol(1), sol(2), sol(1)]);
    }

    #[test]
    fn distinct_keeps_first_occurrences() {
        let seq: SolutionSequence = vec![sol(2), sol(1), sol(2), sol(3), sol(1)].into();
        assert_eq!(seq.distinct().into_vec(), vec![sol(2), sol(1), sol(3)]);
    }

    #[test]
    fn sort_is_stable() {
        let tagged = |o: i64, tag: &str| {
            sol(o)
                .with(Var::new("tag"), Term::from(tag))
                .expect("binding")
        };
        let seq: SolutionSequence = vec![
            tagged(2, "a"),
            tagged(1, "b"),
            tagged(2, "c"),
            tagged(1, "d"),
        ]
        .into();
        let by_o = Var::new("o");
        let sorted = seq.sort_by(|a, b| a.get(&by_o).cmp(&b.get(&by_o)));
        let tags: Vec<_> = sorted
            .iter()
            .filter_map(|s| s.get(&Var::new("tag")).cloned())
            .collect();
        let expected: Vec<Term> = ["b", "d", "a", "c"].into_iter().map(Term::from).collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn sort_survives_inconsistent_comparators() {
        let seq: SolutionSequence = (0..32).map(|v| sol(v % 5)).collect();
        let sorted = seq.sort_by(|_, _| Ordering::Less);
        assert_eq!(sorted.len(), 32);
    }

    #[test]
    fn distinguished_and_blank_variables_differ() {
        assert_ne!(Var::new("x"), Var::nondistinguished("x"));
        assert_eq!(Var::nondistinguished("x").to_string(), "??x");
    }

    #[test]
    fn project_restricts_bindings() {
        let solution = sol(1)
            .with(Var::new("s"), Term::iri("http://example/a"))
            .expect("binding");
        let projected = solution.project(&[Var::new("s")]);
        assert_eq!(projected.len(), 1);
        assert!(!projected.is_bound(&Var::new("o")));
    }
}
