use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::algebra::sparql::constraint;
use crate::algebra::Arity;
use crate::error::{EvalError, Result};
use crate::expr::{compare_for_order, Expression};
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::{stable_sort_by, Solution, SolutionSequence};
use crate::term::Term;

/// Sort direction of one ORDER BY key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// One ORDER BY key: an expression tagged with a direction.
///
/// `(asc e)` and a bare `e` sort identically; only [`OrderKey::desc`] reverses
/// its level of the comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    expression: Expression,
    direction: SortDirection,
    tagged: bool,
}

impl OrderKey {
    /// Untagged key, sorted ascending.
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            direction: SortDirection::Ascending,
            tagged: false,
        }
    }

    /// `(asc expression)`
    pub fn asc(expression: Expression) -> Self {
        Self {
            expression,
            direction: SortDirection::Ascending,
            tagged: true,
        }
    }

    /// `(desc expression)`
    pub fn desc(expression: Expression) -> Self {
        Self {
            expression,
            direction: SortDirection::Descending,
            tagged: true,
        }
    }

    /// The wrapped expression.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Direction of this key.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// `asc`, `desc`, or the wrapped expression's name when untagged.
    pub fn name(&self) -> String {
        match (self.tagged, self.direction) {
            (false, _) => self.expression.name(),
            (true, SortDirection::Ascending) => "asc".to_owned(),
            (true, SortDirection::Descending) => "desc".to_owned(),
        }
    }

    /// Direction tags are unary.
    pub fn arity(&self) -> Arity {
        if self.tagged {
            Arity::Unary
        } else {
            self.expression.arity()
        }
    }

    /// Evaluates the wrapped expression; the tag does not change the value.
    pub fn evaluate(
        &self,
        solution: &Solution,
        options: &ExecOptions,
    ) -> std::result::Result<Term, EvalError> {
        self.expression.evaluate(solution, options)
    }

    /// Applies this key's direction to an ascending comparison.
    pub fn apply_direction(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// ORDER BY condition syntax.
    pub fn to_sparql(&self) -> String {
        let inner = self.expression.to_sparql();
        match (self.tagged, self.direction) {
            (false, _) => match &self.expression {
                Expression::Var(_) => inner,
                other => constraint(other),
            },
            (true, SortDirection::Ascending) => format!("ASC({inner})"),
            (true, SortDirection::Descending) => format!("DESC({inner})"),
        }
    }
}

impl From<Expression> for OrderKey {
    fn from(expression: Expression) -> Self {
        OrderKey::new(expression)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tagged, self.direction) {
            (false, _) => fmt::Display::fmt(&self.expression, f),
            (true, SortDirection::Ascending) => write!(f, "(asc {})", self.expression),
            (true, SortDirection::Descending) => write!(f, "(desc {})", self.expression),
        }
    }
}

type KeyValues = SmallVec<[Option<Term>; 4]>;

/// Stable multi-key sort.
///
/// Key values are computed once per solution; a failed evaluation counts as
/// unbound, and incomparable values tie at that key.
pub(super) fn execute(
    keys: &[OrderKey],
    input: SolutionSequence,
    options: &ExecOptions,
) -> Result<SolutionSequence> {
    let start = profile_timer();
    let mut rescued = 0usize;
    let keyed: Vec<(KeyValues, Solution)> = input
        .into_iter()
        .map(|solution| {
            let values = keys
                .iter()
                .map(|key| match key.evaluate(&solution, options) {
                    Ok(term) => Some(term),
                    Err(err) => {
                        rescued += 1;
                        trace!(
                            key = %key,
                            error = %err,
                            "sparql.order.rescue"
                        );
                        None
                    }
                })
                .collect();
            (values, solution)
        })
        .collect();
    let total = keyed.len();
    let mut by_keys =
        |a: &(KeyValues, Solution), b: &(KeyValues, Solution)| compare_keys(keys, &a.0, &b.0);
    let sorted = stable_sort_by(keyed, &mut by_keys);
    record_profile_timer(ProfileKind::Order, start);
    debug!(
        depth = options.depth,
        keys = keys.len(),
        solutions = total,
        rescued,
        "sparql.order.sort"
    );
    Ok(sorted.into_iter().map(|(_, solution)| solution).collect())
}

fn compare_keys(keys: &[OrderKey], a: &KeyValues, b: &KeyValues) -> Ordering {
    for (key, (x, y)) in keys.iter().zip(a.iter().zip(b.iter())) {
        let ordering = compare_for_order(x.as_ref(), y.as_ref());
        if ordering != Ordering::Equal {
            return key.apply_direction(ordering);
        }
    }
    Ordering::Equal
}
