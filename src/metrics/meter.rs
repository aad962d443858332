use crate::pool::EvictionReason;

// Metric name constants
pub const WORKERS_REGISTERED: &str = "workers_registered_total";
pub const WORKERS_EVICTED: &str = "workers_evicted_total";
pub const POOL_SIZE: &str = "pool_size";

pub const DISPATCHED: &str = "dispatched_total";
pub const DISPATCH_RETRIES: &str = "dispatch_retries_total";
pub const DISPATCH_FAILURES: &str = "dispatch_failures_total";

pub const PROBES: &str = "liveness_probes_total";
pub const PROBE_FAILURES: &str = "liveness_probe_failures_total";

pub const COMPUTED: &str = "computed_total";
pub const PANICKED: &str = "panics_total";

/// Registers descriptions for every metric so the exporter renders HELP lines.
pub fn describe() {
    metrics::describe_counter!(WORKERS_REGISTERED, "Workers added to the pool");
    metrics::describe_counter!(WORKERS_EVICTED, "Workers removed from the pool by reason");
    metrics::describe_gauge!(POOL_SIZE, "Workers currently registered");
    metrics::describe_counter!(DISPATCHED, "Computations answered by a worker");
    metrics::describe_counter!(DISPATCH_RETRIES, "Dispatch attempts repeated after a transport failure");
    metrics::describe_counter!(DISPATCH_FAILURES, "Computations that could not be placed, by reason");
    metrics::describe_counter!(PROBES, "Liveness probes sent");
    metrics::describe_counter!(PROBE_FAILURES, "Liveness probes that failed");
    metrics::describe_counter!(COMPUTED, "Computations executed locally by operation and outcome");
    metrics::describe_counter!(PANICKED, "Handler panics caught by the recover middleware");
}

pub fn inc_registered() {
    metrics::counter!(WORKERS_REGISTERED).increment(1);
}

pub fn inc_evicted(reason: EvictionReason) {
    metrics::counter!(WORKERS_EVICTED, "reason" => reason.as_str()).increment(1);
}

/// Sets the pool size gauge.
pub fn set_pool_size(size: usize) {
    metrics::gauge!(POOL_SIZE).set(size as f64);
}

pub fn inc_dispatched() {
    metrics::counter!(DISPATCHED).increment(1);
}

pub fn inc_retries() {
    metrics::counter!(DISPATCH_RETRIES).increment(1);
}

/// `reason` is either `no_workers` or `worker_unavailable`.
pub fn inc_dispatch_failures(reason: &'static str) {
    metrics::counter!(DISPATCH_FAILURES, "reason" => reason).increment(1);
}

pub fn add_probes(value: u64) {
    metrics::counter!(PROBES).increment(value);
}

pub fn add_probe_failures(value: u64) {
    metrics::counter!(PROBE_FAILURES).increment(value);
}

/// Counts a locally executed computation. `operation` is the raw wire tag,
/// so unknown tags are folded into `unknown` to bound label cardinality.
pub fn inc_computed(operation: &str, ok: bool) {
    let op = match operation {
        "add" => "add",
        "multiply" => "multiply",
        "transpose" => "transpose",
        _ => "unknown",
    };
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(COMPUTED, "operation" => op, "outcome" => outcome).increment(1);
}

pub fn inc_panics() {
    metrics::counter!(PANICKED).increment(1);
}
