//! Optional `tracing` subscriber wiring, gated behind the `diagnostics`
//! feature. The library itself only ever emits `tracing` events (see
//! [`crate::ffi`]'s `guard`) — it never installs a subscriber on its own,
//! since a library forcing a global subscriber on its host process is an
//! antipattern. Callers who just want sensible defaults (a load-test
//! harness, a quick repro) can call [`init`] instead of wiring their own.

use tracing_subscriber::EnvFilter;

/// Install a compact, env-filtered `tracing` subscriber as the process's
/// global default. Respects `RUST_LOG`, falling back to `xbarrier=info`
/// when unset. Calling this more than once is harmless; the second call's
/// error (subscriber already set) is swallowed.
pub fn init() {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("xbarrier=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}
