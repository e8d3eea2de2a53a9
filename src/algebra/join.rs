use tracing::debug;

use crate::error::Result;
use crate::options::ExecOptions;
use crate::profile::{profile_timer, record_profile_timer, ProfileKind};
use crate::solution::SolutionSequence;

/// Nested-loop join: every compatible pair, left order first, then right.
pub(super) fn execute(
    left: SolutionSequence,
    right: SolutionSequence,
    options: &ExecOptions,
) -> Result<SolutionSequence> {
    let start = profile_timer();
    let mut joined = Vec::new();
    for l in &left {
        for r in &right {
            if let Some(merged) = l.merge(r) {
                joined.push(merged);
            }
        }
    }
    record_profile_timer(ProfileKind::Join, start);
    debug!(
        depth = options.depth,
        left = left.len(),
        right = right.len(),
        solutions = joined.len(),
        "sparql.join.execute"
    );
    Ok(joined.into())
}
