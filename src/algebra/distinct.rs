use tracing::debug;

use crate::error::Result;
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::SolutionSequence;

/// Drops every repeated solution, keeping first occurrences in order.
pub(super) fn execute(input: SolutionSequence, options: &ExecOptions) -> Result<SolutionSequence> {
    let start = profile_timer();
    let before = input.len();
    let distinct = input.distinct();
    record_profile_timer(ProfileKind::Distinct, start);
    debug!(
        depth = options.depth,
        input = before,
        output = distinct.len(),
        "sparql.distinct.execute"
    );
    Ok(distinct)
}
