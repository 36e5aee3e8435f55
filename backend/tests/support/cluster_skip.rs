//! Opt-in and skip policy for suites that need embedded PostgreSQL.
//!
//! `RUN_PG_EMBEDDED=1` opts a run into the embedded cluster. When setup
//! still fails, `SKIP_TEST_CLUSTER` decides between skipping and panicking.

fn is_truthy(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Returns true when the run opted into embedded PostgreSQL suites.
pub fn embedded_postgres_enabled() -> bool {
    if is_truthy("RUN_PG_EMBEDDED") {
        return true;
    }
    eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
    false
}

/// Handles cluster setup failures consistently across integration tests.
///
/// Prints a skip marker and returns `None` when `SKIP_TEST_CLUSTER` is truthy;
/// otherwise panics so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if is_truthy("SKIP_TEST_CLUSTER") {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
