//! Per-operator execution profiling, off unless `SOMBRA_SPARQL_PROFILE` is set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Environment variable that enables operator profiling.
pub const PROFILE_ENV: &str = "SOMBRA_SPARQL_PROFILE";

/// A snapshot of operator execution profiling metrics.
///
/// Profiling is enabled via the `SOMBRA_SPARQL_PROFILE` environment variable
/// and records wall time and call counts per operator kind. Times include the
/// time spent in nested operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSnapshot {
    /// Total nanoseconds spent matching basic graph patterns.
    pub bgp_ns: u64,
    /// Number of basic graph pattern executions.
    pub bgp_count: u64,
    /// Total nanoseconds spent joining.
    pub join_ns: u64,
    /// Number of join executions.
    pub join_count: u64,
    /// Total nanoseconds spent filtering.
    pub filter_ns: u64,
    /// Number of filter executions.
    pub filter_count: u64,
    /// Total nanoseconds spent sorting.
    pub order_ns: u64,
    /// Number of order executions.
    pub order_count: u64,
    /// Total nanoseconds spent removing adjacent duplicates.
    pub reduced_ns: u64,
    /// Number of reduced executions.
    pub reduced_count: u64,
    /// Total nanoseconds spent removing all duplicates.
    pub distinct_ns: u64,
    /// Number of distinct executions.
    pub distinct_count: u64,
    /// Total nanoseconds spent projecting.
    pub project_ns: u64,
    /// Number of project executions.
    pub project_count: u64,
}

#[derive(Default)]
struct ProfileCounters {
    bgp_ns: AtomicU64,
    bgp_count: AtomicU64,
    join_ns: AtomicU64,
    join_count: AtomicU64,
    filter_ns: AtomicU64,
    filter_count: AtomicU64,
    order_ns: AtomicU64,
    order_count: AtomicU64,
    reduced_ns: AtomicU64,
    reduced_count: AtomicU64,
    distinct_ns: AtomicU64,
    distinct_count: AtomicU64,
    project_ns: AtomicU64,
    project_count: AtomicU64,
}

impl ProfileCounters {
    fn slot(&self, kind: ProfileKind) -> (&AtomicU64, &AtomicU64) {
        match kind {
            ProfileKind::Bgp => (&self.bgp_ns, &self.bgp_count),
            ProfileKind::Join => (&self.join_ns, &self.join_count),
            ProfileKind::Filter => (&self.filter_ns, &self.filter_count),
            ProfileKind::Order => (&self.order_ns, &self.order_count),
            ProfileKind::Reduced => (&self.reduced_ns, &self.reduced_count),
            ProfileKind::Distinct => (&self.distinct_ns, &self.distinct_count),
            ProfileKind::Project => (&self.project_ns, &self.project_count),
        }
    }
}

static PROFILE_ENABLED: OnceLock<bool> = OnceLock::new();
static PROFILE_COUNTERS: OnceLock<ProfileCounters> = OnceLock::new();

fn profiling_enabled() -> bool {
    *PROFILE_ENABLED.get_or_init(|| std::env::var_os(PROFILE_ENV).is_some())
}

fn counters() -> Option<&'static ProfileCounters> {
    profiling_enabled().then(|| PROFILE_COUNTERS.get_or_init(ProfileCounters::default))
}

pub(crate) fn profile_timer() -> Option<Instant> {
    profiling_enabled().then(Instant::now)
}

/// Operator kinds tracked by the profiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProfileKind {
    Bgp,
    Join,
    Filter,
    Order,
    Reduced,
    Distinct,
    Project,
}

pub(crate) fn record_profile_timer(kind: ProfileKind, start: Option<Instant>) {
    let Some(start) = start else {
        return;
    };
    let Some(counters) = counters() else {
        return;
    };
    let nanos = start.elapsed().as_nanos().min(u64::MAX as u128) as u64;
    let (ns, count) = counters.slot(kind);
    ns.fetch_add(nanos, Ordering::Relaxed);
    count.fetch_add(1, Ordering::Relaxed);
}

/// Retrieves a snapshot of the operator profiling metrics.
///
/// Returns `None` when profiling is disabled.
///
/// ```no_run
/// use sombra_sparql::profile::profile_snapshot;
///
/// if let Some(snapshot) = profile_snapshot() {
///     println!("filter: {} calls, {}ns", snapshot.filter_count, snapshot.filter_ns);
/// }
/// ```
pub fn profile_snapshot() -> Option<ProfileSnapshot> {
    let counters = counters()?;
    Some(read_counters(counters, |counter| counter.load(Ordering::Relaxed)))
}

/// Zeroes every counter, returning the values they held.
pub fn reset_profile() -> Option<ProfileSnapshot> {
    let counters = counters()?;
    Some(read_counters(counters, |counter| counter.swap(0, Ordering::Relaxed)))
}

fn read_counters(counters: &ProfileCounters, load: impl Fn(&AtomicU64) -> u64) -> ProfileSnapshot {
    ProfileSnapshot {
        bgp_ns: load(&counters.bgp_ns),
        bgp_count: load(&counters.bgp_count),
        join_ns: load(&counters.join_ns),
        join_count: load(&counters.join_count),
        filter_ns: load(&counters.filter_ns),
        filter_count: load(&counters.filter_count),
        order_ns: load(&counters.order_ns),
        order_count: load(&counters.order_count),
        reduced_ns: load(&counters.reduced_ns),
        reduced_count: load(&counters.reduced_count),
        distinct_ns: load(&counters.distinct_ns),
        distinct_count: load(&counters.distinct_count),
        project_ns: load(&counters.project_ns),
        project_count: load(&counters.project_count),
    }
}
