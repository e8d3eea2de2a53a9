use tracing::debug;

use crate::error::Result;
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::SolutionSequence;

/// Drops each solution identical to its immediate predecessor.
pub(super) fn execute(input: SolutionSequence, options: &ExecOptions) -> Result<SolutionSequence> {
    let start = profile_timer();
    let before = input.len();
    let reduced = input.reduced();
    record_profile_timer(ProfileKind::Reduced, start);
    debug!(
        depth = options.depth,
        input = before,
        output = reduced.len(),
        "sparql.reduced.execute"
    );
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{Solution, Var};

    fn sol(tag: &str) -> Solution {
        Solution::new().with(Var::new("x"), tag).expect("binding")
    }

    #[test]
    fn removes_adjacent_duplicates_only() -> Result<()> {
        let input: SolutionSequence = vec![sol("a"), sol("a"), sol("b"), sol("a")].into();
        let output = execute(input, &ExecOptions::default())?;
        assert_eq!(output.into_vec(), vec![sol("a"), sol("b"), sol("a")]);
        Ok(())
    }

    #[test]
    fn empty_input_stays_empty() -> Result<()> {
        let output = execute(SolutionSequence::new(), &ExecOptions::default())?;
        assert!(output.is_empty());
        Ok(())
    }
}
