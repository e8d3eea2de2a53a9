use tracing::debug;

use crate::error::Result;
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::{SolutionSequence, Var};

/// Restricts every solution to `vars`, keeping order and multiplicity.
pub(super) fn execute(
    vars: &[Var],
    input: SolutionSequence,
    options: &ExecOptions,
) -> Result<SolutionSequence> {
    let start = profile_timer();
    let projected: SolutionSequence = input
        .iter()
        .map(|solution| solution.project(vars))
        .collect();
    record_profile_timer(ProfileKind::Project, start);
    debug!(
        depth = options.depth,
        vars = vars.len(),
        solutions = projected.len(),
        "sparql.project.execute"
    );
    Ok(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Solution;
    use crate::term::Term;

    #[test]
    fn keeps_duplicates_after_projection() -> Result<()> {
        let input: SolutionSequence = [1i64, 2]
            .into_iter()
            .map(|o| {
                Solution::new()
                    .with(Var::new("s"), Term::iri("http://example/x"))
                    .and_then(|s| s.with(Var::new("o"), o))
                    .expect("bindings")
            })
            .collect();
        let output = execute(&[Var::new("s")], input, &ExecOptions::default())?;
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|s| s.len() == 1));
        Ok(())
    }
}
