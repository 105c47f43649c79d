//! Shared test utilities for the split ledger test suite
//!
//! - [`builders`]: fluent builders for split requests and entities
//! - [`fixtures`]: canonical users, groups, and amounts
//! - [`assertions`]: domain-aware assertion helpers
//! - [`generators`]: proptest strategies that respect ledger invariants

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
});

/// Initializes tracing once for the whole test binary
///
/// Respects `RUST_LOG`; defaults to `warn` so test output stays quiet.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
