use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::expr::Expression;
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::SolutionSequence;

/// Keeps the solutions whose condition has effective boolean value `true`.
///
/// A failed evaluation excludes the solution. With
/// [`ExecOptions::strict_filter_errors`] set, failures other than type errors
/// abort execution instead.
pub(super) fn execute(
    condition: &Expression,
    input: SolutionSequence,
    options: &ExecOptions,
) -> Result<SolutionSequence> {
    let start = profile_timer();
    let total = input.len();
    let mut kept = Vec::with_capacity(total);
    let mut rescued = 0usize;
    for solution in input {
        match condition.evaluate_ebv(&solution, options) {
            Ok(true) => kept.push(solution),
            Ok(false) => {}
            Err(err) if options.strict_filter_errors && !err.is_type_error() => {
                record_profile_timer(ProfileKind::Filter, start);
                return Err(QueryError::Eval(err));
            }
            Err(err) => {
                rescued += 1;
                trace!(
                    error = %err,
                    solution = %solution,
                    "sparql.filter.rescue"
                );
            }
        }
    }
    record_profile_timer(ProfileKind::Filter, start);
    debug!(
        depth = options.depth,
        condition = %condition,
        input = total,
        kept = kept.len(),
        rescued,
        "sparql.filter.execute"
    );
    Ok(kept.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::expr::{ArithOp, CompareOp};
    use crate::solution::{Solution, Var};
    use crate::term::Term;

    fn sol(value: impl Into<Term>) -> Solution {
        Solution::new().with(Var::new("v"), value).expect("binding")
    }

    fn equals(value: i64) -> Expression {
        Expression::compare(CompareOp::Eq, Expression::var("v"), Expression::term(value))
    }

    #[test]
    fn keeps_only_true_solutions_in_order() -> Result<()> {
        let input: SolutionSequence = vec![sol(1i64), sol(2i64), sol(3i64)].into();
        let kept = execute(&equals(2), input, &ExecOptions::default())?;
        assert_eq!(kept.into_vec(), vec![sol(2i64)]);
        Ok(())
    }

    #[test]
    fn evaluation_errors_exclude_only_that_solution() -> Result<()> {
        let input: SolutionSequence =
            vec![sol(1i64), Solution::new(), sol("two"), sol(2i64)].into();
        let condition = Expression::compare(
            CompareOp::Gt,
            Expression::arith(ArithOp::Add, Expression::var("v"), Expression::term(1i64)),
            Expression::term(2i64),
        );
        let kept = execute(&condition, input, &ExecOptions::default())?;
        assert_eq!(kept.into_vec(), vec![sol(2i64)]);
        Ok(())
    }

    #[test]
    fn strict_mode_surfaces_non_type_errors() -> Result<()> {
        let options = ExecOptions {
            strict_filter_errors: true,
            ..ExecOptions::default()
        };
        let input: SolutionSequence = vec![sol(1i64), Solution::new()].into();
        let err = execute(&equals(1), input, &options);
        assert!(matches!(
            err,
            Err(QueryError::Eval(EvalError::Unbound { .. }))
        ));

        let input: SolutionSequence = vec![sol("text")].into();
        let below_one = Expression::compare(
            CompareOp::Lt,
            Expression::var("v"),
            Expression::term(1i64),
        );
        assert!(execute(&below_one, input, &options)?.is_empty());
        Ok(())
    }

    #[test]
    fn non_boolean_conditions_use_effective_boolean_value() -> Result<()> {
        let input: SolutionSequence = vec![sol(0i64), sol(""), sol("x"), sol(5i64)].into();
        let kept = execute(&Expression::var("v"), input, &ExecOptions::default())?;
        assert_eq!(kept.into_vec(), vec![sol("x"), sol(5i64)]);
        Ok(())
    }
}
