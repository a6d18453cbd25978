//! Host capability traits: the seam between this crate's pure parsing core
//! and whatever catalog/binder/vector-allocator a real embedding provides.
//! `NativeHostCapabilities` is the default implementation used by tests, the
//! CLI binary, and any caller that doesn't have a host of its own.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

/// File access, abstracted so an embedding host can substitute its own
/// virtual filesystem (e.g. an in-memory catalog of attached files).
pub trait FilesystemCapability: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn glob(&self, pattern: &str) -> EngineResult<Vec<PathBuf>>;
    fn read_to_string(&self, path: &Path) -> EngineResult<String>;
    fn join(&self, base: &Path, part: &str) -> PathBuf;
}

/// Worker-pool access. A host embedding a real query engine typically already
/// owns a thread/task pool and wants parse work submitted to it rather than
/// to a second, independent pool.
pub trait SchedulerCapability: Send + Sync {
    /// Runs `task` once per item in `0..count`, waiting for all to finish.
    /// `task` receives its item index. Implementations decide how many
    /// OS threads that maps to; the caller only needs "all done" semantics.
    fn run_indexed(&self, count: usize, task: &(dyn Fn(usize) + Sync));
    fn worker_count(&self) -> u32;
}

/// Per-column fixed-size buffer allocation, the seam a real vectorized query
/// engine fills in to avoid an extra copy between this crate's row batches
/// and its native column format. The default implementation is a no-op that
/// reports no preferred size, leaving `EngineConfig::batch_size` in force.
pub trait VectorCapability: Send + Sync {
    fn preferred_batch_size(&self) -> Option<u32> {
        None
    }
}

/// Function registration, the seam a real embedding fills in to wire
/// `read_ast`/`parse_ast`/the scalar predicates into a live SQL catalog. The
/// in-process Rust API in [`crate::operators`] works without this trait;
/// it exists so a host can additionally expose the same operators as SQL.
pub trait RegistrationCapability: Send + Sync {
    fn register_table_function(&self, name: &str) -> EngineResult<()>;
    fn register_scalar_function(&self, name: &str) -> EngineResult<()>;
}

/// Bundles the two capabilities the parse scheduler actually needs into one
/// object-safe trait, so `scheduler::run` can take a single `&dyn
/// HostCapabilities` instead of threading two separate trait objects through
/// its call chain. Blanket-implemented for anything that has both.
pub trait HostCapabilities: FilesystemCapability + SchedulerCapability {}
impl<T: FilesystemCapability + SchedulerCapability> HostCapabilities for T {}

/// The default, non-embedded implementation of every capability, built on
/// `std::fs` and a `rayon` thread pool sized to `worker_count`.
pub struct NativeHostCapabilities {
    worker_count: u32,
}

impl NativeHostCapabilities {
    pub fn new(worker_count: u32) -> Self {
        NativeHostCapabilities { worker_count: worker_count.max(1) }
    }
}

impl Default for NativeHostCapabilities {
    fn default() -> Self {
        NativeHostCapabilities::new(num_cpus::get() as u32)
    }
}

impl FilesystemCapability for NativeHostCapabilities {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn glob(&self, pattern: &str) -> EngineResult<Vec<PathBuf>> {
        crate::scheduler::expand_pattern(pattern)
    }

    fn read_to_string(&self, path: &Path) -> EngineResult<String> {
        fs::read_to_string(path).map_err(|e| EngineError::io(path, e))
    }

    fn join(&self, base: &Path, part: &str) -> PathBuf {
        base.join(part)
    }
}

impl SchedulerCapability for NativeHostCapabilities {
    fn run_indexed(&self, count: usize, task: &(dyn Fn(usize) + Sync)) {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count as usize)
            .build()
            .expect("failed to build native worker pool");
        pool.scope(|scope| {
            for index in 0..count {
                scope.spawn(move |_| task(index));
            }
        });
    }

    fn worker_count(&self) -> u32 {
        self.worker_count
    }
}

impl VectorCapability for NativeHostCapabilities {}

impl RegistrationCapability for NativeHostCapabilities {
    fn register_table_function(&self, _name: &str) -> EngineResult<()> {
        Err(EngineError::binder(
            "NativeHostCapabilities has no catalog to register functions into; provide a host-specific RegistrationCapability",
        ))
    }

    fn register_scalar_function(&self, _name: &str) -> EngineResult<()> {
        Err(EngineError::binder(
            "NativeHostCapabilities has no catalog to register functions into; provide a host-specific RegistrationCapability",
        ))
    }
}
