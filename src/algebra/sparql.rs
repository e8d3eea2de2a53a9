//! Rendering operator trees back to SPARQL query text.
//!
//! Modifiers do not wrap their operand in new syntax. Each one records its
//! clause in [`SparqlOptions`] and hands the options down, so the leaf that
//! finally renders emits `SELECT … WHERE { … } ORDER BY …` in one piece.
//! When a modifier sits below one that SPARQL applies earlier (a projection
//! under a filter, say), the lower subtree is emitted as a sub-select.

use crate::expr::Expression;
use crate::solution::Var;

use super::Operator;

/// Solution-modifier stages in the order SPARQL applies them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Filter,
    Order,
    Project,
    Modifier,
}

/// Clauses accumulated from enclosing modifiers.
#[derive(Clone, Debug, Default)]
pub(crate) struct SparqlOptions {
    filters: Vec<String>,
    order: Vec<String>,
    project: Option<Vec<Var>>,
    distinct: bool,
    reduced: bool,
    stage: Option<Stage>,
}

impl SparqlOptions {
    fn admits(&self, stage: Stage) -> bool {
        self.stage.map_or(true, |current| stage <= current)
    }

    fn finish(&self, body: &str) -> String {
        let mut out = String::from("SELECT");
        if self.distinct {
            out.push_str(" DISTINCT");
        } else if self.reduced {
            out.push_str(" REDUCED");
        }
        match &self.project {
            Some(vars) if !vars.is_empty() => {
                for var in vars {
                    out.push(' ');
                    out.push_str(&var.to_string());
                }
            }
            _ => out.push_str(" *"),
        }
        let mut group: Vec<&str> = Vec::new();
        if !body.is_empty() {
            group.push(body);
        }
        group.extend(self.filters.iter().map(String::as_str));
        if group.is_empty() {
            out.push_str(" WHERE { }");
        } else {
            out.push_str(&format!(" WHERE {{ {} }}", group.join(" ")));
        }
        if !self.order.is_empty() {
            out.push_str(" ORDER BY ");
            out.push_str(&self.order.join(" "));
        }
        out
    }
}

/// Wraps `text` in parentheses unless it already is a parenthesized form.
fn bracketed(text: String) -> String {
    if text.starts_with('(') {
        text
    } else {
        format!("({text})")
    }
}

/// Expression in a position that takes a bracketed expression or a call.
pub(crate) fn constraint(expression: &Expression) -> String {
    match expression {
        Expression::Bound(_) | Expression::Str(_) | Expression::Call { .. } => {
            expression.to_sparql()
        }
        other => bracketed(other.to_sparql()),
    }
}

fn filter_clause(condition: &Expression) -> String {
    format!("FILTER {}", constraint(condition))
}

impl Operator {
    /// Renders this tree as a SPARQL `SELECT` query.
    pub fn to_sparql(&self) -> String {
        self.render(SparqlOptions::default())
    }

    fn stage(&self) -> Option<Stage> {
        match self {
            Operator::Bgp(_) | Operator::Join(..) => None,
            Operator::Filter { .. } => Some(Stage::Filter),
            Operator::Order { .. } => Some(Stage::Order),
            Operator::Project { .. } => Some(Stage::Project),
            Operator::Reduced(_) | Operator::Distinct(_) => Some(Stage::Modifier),
        }
    }

    pub(crate) fn render(&self, mut options: SparqlOptions) -> String {
        if let Some(stage) = self.stage() {
            if !options.admits(stage) {
                let inner = self.render(SparqlOptions::default());
                return options.finish(&format!("{{ {inner} }}"));
            }
            options.stage = Some(stage);
        }
        match self {
            Operator::Bgp(pattern) => options.finish(&pattern.sparql_body()),
            Operator::Join(left, right) => {
                let body = format!("{} {}", left.group(), right.group());
                options.finish(&body)
            }
            Operator::Filter { condition, input } => {
                options
                    .filters
                    .extend(condition.conjuncts().into_iter().map(filter_clause));
                input.render(options)
            }
            Operator::Order { keys, input } => {
                options.order.extend(keys.iter().map(|key| key.to_sparql()));
                input.render(options)
            }
            Operator::Reduced(input) => {
                options.reduced = true;
                input.render(options)
            }
            Operator::Distinct(input) => {
                options.distinct = true;
                input.render(options)
            }
            Operator::Project { vars, input } => {
                if options.project.is_none() {
                    options.project = Some(vars.clone());
                }
                input.render(options)
            }
        }
    }

    /// Group graph pattern contents for use inside a join.
    fn group(&self) -> String {
        match self {
            Operator::Bgp(pattern) => pattern.sparql_body(),
            Operator::Join(left, right) => format!("{} {}", left.group(), right.group()),
            modifier => format!("{{ {} }}", modifier.to_sparql()),
        }
    }
}
