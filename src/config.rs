//! Engine-wide configuration: worker count, table-producer batch size, debug mode.
//!
//! Everything else that tunes a single run (peek mode, extraction levels,
//! ignore_errors) travels with the call, not with this struct — see
//! [`crate::node::ExtractionConfig`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker thread count for the parallel scheduler.
    pub parallel_workers: u32,
    /// Rows per batch emitted by the table producer.
    pub batch_size: u32,
    pub debug_mode: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_workers: num_cpus::get() as u32,
            batch_size: 2048,
            debug_mode: false,
        }
    }
}

impl EngineConfig {
    /// Load from `AST_PARALLEL_WORKERS` / `AST_BATCH_SIZE` / `AST_DEBUG`, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            parallel_workers: std::env::var("AST_PARALLEL_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.parallel_workers),
            batch_size: std::env::var("AST_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.batch_size),
            debug_mode: std::env::var("AST_DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(default.debug_mode),
        }
    }
}

/// Install a `tracing` subscriber driven by `RUST_LOG`/`AST_LOG`. Never called
/// implicitly by the engine itself; embedders opt in.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("AST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).try_init();
}
