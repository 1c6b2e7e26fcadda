//! Process-wide knobs read from the environment once and cached in a
//! `OnceLock`, so repeated calls never re-read the environment.

use std::sync::OnceLock;

/// Runtime configuration for the kernel dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct KernelConfig {
    /// Force the portable scalar kernel even when AVX2 is available.
    /// Set via `XBARRIER_FORCE_SCALAR=1` (or `true`). Useful for testing
    /// the scalar fallback on an AVX2 host, and for benchmarking the
    /// speedup AVX2 buys over the scalar path.
    pub force_scalar: bool,
}

impl KernelConfig {
    fn from_env() -> Self {
        let force_scalar = std::env::var("XBARRIER_FORCE_SCALAR")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self { force_scalar }
    }
}

static CONFIG: OnceLock<KernelConfig> = OnceLock::new();

/// The process-wide kernel configuration, read from the environment on
/// first use and cached for the lifetime of the process.
pub fn kernel_config() -> KernelConfig {
    *CONFIG.get_or_init(KernelConfig::from_env)
}
