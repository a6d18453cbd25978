//! File-pattern expansion and the parallel multi-file parse scheduler.
//!
//! Mirrors the batch processor's shape (progress counters, continue-on-error,
//! per-file results) but delegates worker-pool fan-out and file reads to a
//! [`crate::host::HostCapabilities`] rather than hardcoding `rayon`/`std::fs`
//! — `NativeHostCapabilities` backs both by default. Results land in a shared
//! buffer in completion order, not input order — callers that need a stable
//! file order must sort on `ASTResult::source.file_path` themselves.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::engine::parse_source;
use crate::error::{EngineError, EngineResult};
use crate::host::HostCapabilities;
use crate::language::{detect_language, unsupported_language, AdapterRegistry};
use crate::node::{ASTResult, ExtractionConfig};

/// Counters and diagnostics for one scheduler run. Cheap to read mid-run;
/// every field is lock-free except the error message log.
#[derive(Default, Debug)]
pub struct RunReport {
    pub files_processed: AtomicU64,
    pub total_nodes: AtomicU64,
    pub errors_encountered: AtomicU64,
    error_messages: Mutex<Vec<String>>,
    pub parse_time_ms: AtomicU64,
}

impl RunReport {
    fn record_error(&self, message: String) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
        self.error_messages.lock().unwrap().push(message);
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.error_messages.lock().unwrap().clone()
    }
}

/// Expands a user-supplied pattern into concrete file paths.
///
/// - A literal existing file resolves to itself.
/// - An existing directory is walked recursively; every regular file under it
///   is included regardless of extension (language resolution, not pattern
///   expansion, decides what gets parsed).
/// - Anything else is handed to `glob` as a shell-style pattern.
pub fn expand_pattern(pattern: &str) -> EngineResult<Vec<PathBuf>> {
    let path = Path::new(pattern);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        let mut files = Vec::new();
        walk_directory(path, &mut files)?;
        files.sort();
        return Ok(files);
    }

    let mut matches = Vec::new();
    let entries = glob::glob(pattern)
        .map_err(|e| EngineError::binder(format!("invalid glob pattern {pattern:?}: {e}")))?;
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => matches.push(path),
            Ok(_) => {}
            Err(e) => return Err(EngineError::io(pattern, std::io::Error::new(std::io::ErrorKind::Other, e))),
        }
    }
    matches.sort();
    Ok(matches)
}

fn walk_directory(dir: &Path, out: &mut Vec<PathBuf>) -> EngineResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            walk_directory(&path, out)?;
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Expands every pattern in `patterns`, deduplicating by canonical path order
/// of first appearance.
pub fn expand_patterns(patterns: &[String]) -> EngineResult<Vec<PathBuf>> {
    let mut all = Vec::new();
    for pattern in patterns {
        all.extend(expand_pattern(pattern)?);
    }
    Ok(all)
}

/// Resolves the language for one file: `language_override` wins when given
/// and isn't `"auto"`, otherwise falls back to extension detection.
///
/// Both failure modes below — no extension match at all, and a recognized
/// extension with no implemented adapter — are tolerable `Parse` errors, the
/// same category `AdapterRegistry::create_adapter` raises for the latter
/// case. A single unresolvable file never aborts a multi-file run by itself;
/// `run` escalates to a `Binder` error only if the whole file set ends up
/// with nothing resolved.
pub fn resolve_language(path: &Path, language_override: Option<&str>) -> EngineResult<String> {
    let candidate = match language_override {
        Some(lang) if lang != "auto" => lang.to_string(),
        _ => detect_language(path).to_string(),
    };
    if candidate == "auto" {
        return Err(EngineError::parse(
            Some(path.to_path_buf()),
            "auto",
            "no extension match and no override given",
        ));
    }
    if !AdapterRegistry::get().is_registered(&candidate) {
        return Err(unsupported_language(&candidate));
    }
    Ok(candidate)
}

/// Parses `files` using `host`'s worker pool (`SchedulerCapability`) and file
/// reads (`FilesystemCapability`) — `NativeHostCapabilities` wraps `rayon`
/// and `std::fs` for the common case; an embedding host can substitute its
/// own pool and virtual filesystem.
///
/// `host.run_indexed` gives one task per file index with no ordering
/// guarantee, so results land in a shared buffer in completion order, not
/// input order — callers that need a stable order must sort on
/// `ASTResult::source.file_path` themselves.
///
/// Per-file language resolution failures are always tolerated, independent
/// of `ignore_errors` — a file this engine can't classify is dropped from
/// the result set and its error recorded, never aborting the run by itself.
/// For a file whose language *did* resolve, a subsequent read/parse error
/// honors `ignore_errors` as usual: skipped and recorded when set, otherwise
/// the first such error aborts the run. Either way, if every file in a
/// non-empty input set ends up contributing nothing, `run` raises a
/// `Binder` error rather than returning an empty, silently-useless result.
pub fn run(
    files: &[PathBuf],
    language_override: Option<&str>,
    ignore_errors: bool,
    config: ExtractionConfig,
    host: &dyn HostCapabilities,
) -> EngineResult<(Vec<ASTResult>, RunReport)> {
    info!(file_count = files.len(), worker_count = host.worker_count(), ignore_errors, "starting scheduler run");
    let report = RunReport::default();
    let results: Mutex<Vec<ASTResult>> = Mutex::new(Vec::new());
    let first_fatal: Mutex<Option<EngineError>> = Mutex::new(None);

    host.run_indexed(files.len(), &|index| {
        if first_fatal.lock().unwrap().is_some() {
            return;
        }
        let path = &files[index];
        // Language resolution failures are always tolerated per-file,
        // independent of `ignore_errors`: a file this engine doesn't know
        // how to classify is simply not part of the result set.
        // `ignore_errors` governs genuine read/parse failures on a file
        // whose language *did* resolve.
        let language = match resolve_language(path, language_override) {
            Ok(language) => language,
            Err(err) => {
                debug!(file = %path.display(), error = %err, "skipping file with unresolvable language");
                report.record_error(format!("{}: {err}", path.display()));
                return;
            }
        };
        match parse_one(host, path, &language, config) {
            Ok(result) => {
                debug!(file = %path.display(), nodes = result.node_count, "file parsed");
                report.files_processed.fetch_add(1, Ordering::Relaxed);
                report.total_nodes.fetch_add(result.node_count as u64, Ordering::Relaxed);
                report.parse_time_ms.fetch_add(result.parse_time_ms as u64, Ordering::Relaxed);
                results.lock().unwrap().push(result);
            }
            Err(err) => {
                if err.is_tolerable() && ignore_errors {
                    warn!(file = %path.display(), error = %err, "skipping file after tolerable error");
                    report.record_error(format!("{}: {err}", path.display()));
                } else {
                    warn!(file = %path.display(), error = %err, "aborting run on error");
                    *first_fatal.lock().unwrap() = Some(err);
                }
            }
        }
    });

    if let Some(err) = first_fatal.into_inner().unwrap() {
        warn!(error = %err, "scheduler run aborted");
        return Err(err);
    }

    let merged = results.into_inner().unwrap();

    if merged.is_empty() && !files.is_empty() {
        let err = EngineError::binder(format!(
            "none of the {} file(s) in the pattern set resolved to a known, implemented language",
            files.len()
        ));
        warn!(error = %err, "scheduler run resolved zero files");
        return Err(err);
    }

    info!(
        files_processed = report.files_processed.load(Ordering::Relaxed),
        total_nodes = report.total_nodes.load(Ordering::Relaxed),
        errors_encountered = report.errors_encountered.load(Ordering::Relaxed),
        "scheduler run finished"
    );
    Ok((merged, report))
}

/// Reads and parses `path` through `host`'s filesystem capability, once its
/// language has already been resolved by the caller (`resolve_language`'s
/// failures are handled separately in `run`, tolerated regardless of
/// `ignore_errors`).
fn parse_one(host: &dyn HostCapabilities, path: &Path, language: &str, config: ExtractionConfig) -> EngineResult<ASTResult> {
    let source = host.read_to_string(path)?;
    let adapter = AdapterRegistry::get().create_adapter(language)?;
    let file_path = path.to_string_lossy().to_string();
    parse_source(adapter.as_ref(), &source, &file_path, config)
}

/// Convenience timer wrapper used by callers that want wall-clock run time
/// alongside the report's summed per-file parse time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::host::NativeHostCapabilities;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn expand_pattern_resolves_literal_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_temp(&dir, "a.py", "x = 1\n");
        let expanded = expand_pattern(file.to_str().unwrap()).unwrap();
        assert_eq!(expanded, vec![file]);
    }

    #[test]
    fn expand_pattern_walks_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        write_temp(&dir, "a.py", "x = 1\n");
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.py"), "y = 2\n").unwrap();
        let expanded = expand_pattern(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(expanded.len(), 2);
    }

    #[test]
    fn resolve_language_uses_override_when_not_auto() {
        let path = Path::new("anything.weird");
        assert_eq!(resolve_language(path, Some("python")).unwrap(), "python");
    }

    #[test]
    fn resolve_language_falls_back_to_detection() {
        let path = Path::new("main.rs");
        assert_eq!(resolve_language(path, None).unwrap(), "rust");
    }

    #[test]
    fn resolve_language_errors_on_unresolvable() {
        let path = Path::new("Makefile");
        let err = resolve_language(path, None).unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
        assert!(err.is_tolerable());
    }

    #[test]
    fn resolve_language_is_tolerable_for_recognized_but_unimplemented_extension() {
        // ".json" matches detect.rs's extension table but has no adapter.
        let path = Path::new("package.json");
        let err = resolve_language(path, None).unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
        assert!(err.is_tolerable());
    }

    #[test]
    fn run_parses_multiple_files_and_reports_totals() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_temp(&dir, "a.py", "x = 1\n");
        let b = write_temp(&dir, "b.py", "y = 2\n");
        let (results, report) = run(&[a, b], None, false, ExtractionConfig::default(), &NativeHostCapabilities::new(2)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(report.files_processed.load(Ordering::Relaxed), 2);
        assert!(report.total_nodes.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn run_with_ignore_errors_skips_unreadable_and_records_message() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_temp(&dir, "a.py", "x = 1\n");
        let missing = dir.path().join("missing.py");
        let (results, report) = run(&[good, missing], None, true, ExtractionConfig::default(), &NativeHostCapabilities::new(2)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(report.errors_encountered.load(Ordering::Relaxed), 1);
        assert_eq!(report.error_messages().len(), 1);
    }

    #[test]
    fn run_without_ignore_errors_propagates_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.py");
        let result = run(&[missing], None, false, ExtractionConfig::default(), &NativeHostCapabilities::new(1));
        assert!(result.is_err());
    }

    #[test]
    fn run_with_mixed_resolvability_keeps_resolvable_files_under_ignore_errors() {
        let dir = tempfile::tempdir().unwrap();
        let resolvable = write_temp(&dir, "a.py", "x = 1\n");
        let unresolvable = write_temp(&dir, "data.json", "{}\n");
        let (results, report) = run(
            &[resolvable.clone(), unresolvable],
            None,
            true,
            ExtractionConfig::default(),
            &NativeHostCapabilities::new(2),
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source.file_path, resolvable.to_string_lossy());
        assert_eq!(report.files_processed.load(Ordering::Relaxed), 1);
        assert_eq!(report.errors_encountered.load(Ordering::Relaxed), 1);
        assert_eq!(report.error_messages().len(), 1);
    }

    #[test]
    fn run_with_mixed_resolvability_succeeds_even_without_ignore_errors() {
        // Resolution failures are tolerated unconditionally; `ignore_errors`
        // only governs genuine read/parse failures on a resolved file.
        let dir = tempfile::tempdir().unwrap();
        let resolvable = write_temp(&dir, "a.py", "x = 1\n");
        let unresolvable = write_temp(&dir, "data.json", "{}\n");
        let (results, report) = run(
            &[resolvable.clone(), unresolvable],
            None,
            false,
            ExtractionConfig::default(),
            &NativeHostCapabilities::new(2),
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source.file_path, resolvable.to_string_lossy());
        assert_eq!(report.errors_encountered.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn run_with_all_unresolvable_files_escalates_to_binder_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_temp(&dir, "a.json", "{}\n");
        let b = write_temp(&dir, "b.json", "{}\n");
        let err = run(&[a, b], None, true, ExtractionConfig::default(), &NativeHostCapabilities::new(2)).unwrap_err();
        assert!(matches!(err, EngineError::Binder(_)));
    }

    #[test]
    fn run_on_a_single_unresolvable_file_escalates_to_binder_error_without_ignore_errors() {
        let dir = tempfile::tempdir().unwrap();
        let unresolvable = write_temp(&dir, "data.unknownext", "whatever\n");
        let err = run(&[unresolvable], None, false, ExtractionConfig::default(), &NativeHostCapabilities::new(1)).unwrap_err();
        assert!(matches!(err, EngineError::Binder(_)));
    }

    #[test]
    fn run_goes_through_the_supplied_host_capability_for_file_reads() {
        use crate::error::EngineResult as Res;
        use crate::host::{FilesystemCapability, SchedulerCapability};
        use std::path::Path as StdPath;
        use std::sync::atomic::AtomicUsize;

        struct CountingHost {
            reads: AtomicUsize,
            inner: NativeHostCapabilities,
        }
        impl FilesystemCapability for CountingHost {
            fn exists(&self, path: &StdPath) -> bool {
                self.inner.exists(path)
            }
            fn is_dir(&self, path: &StdPath) -> bool {
                self.inner.is_dir(path)
            }
            fn glob(&self, pattern: &str) -> Res<Vec<PathBuf>> {
                self.inner.glob(pattern)
            }
            fn read_to_string(&self, path: &StdPath) -> Res<String> {
                self.reads.fetch_add(1, Ordering::Relaxed);
                self.inner.read_to_string(path)
            }
            fn join(&self, base: &StdPath, part: &str) -> PathBuf {
                self.inner.join(base, part)
            }
        }
        impl SchedulerCapability for CountingHost {
            fn run_indexed(&self, count: usize, task: &(dyn Fn(usize) + Sync)) {
                self.inner.run_indexed(count, task);
            }
            fn worker_count(&self) -> u32 {
                self.inner.worker_count()
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let a = write_temp(&dir, "a.py", "x = 1\n");
        let host = CountingHost {
            reads: AtomicUsize::new(0),
            inner: NativeHostCapabilities::new(1),
        };
        let (results, _report) = run(&[a], None, false, ExtractionConfig::default(), &host).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(host.reads.load(Ordering::Relaxed), 1);
    }
}
