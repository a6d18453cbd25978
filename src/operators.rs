//! In-process Rust projections of the SQL surface (§6): `read_ast`,
//! `parse_ast`, `ast_supported_languages`, `semantic_type_codes`, and the
//! scalar taxonomy predicates. These operate directly on `Vec<ASTNode>`/
//! iterators rather than a live catalog — wiring them into an actual query
//! engine is what [`crate::host::RegistrationCapability`] is for.

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::parse_source;
use crate::error::{EngineError, EngineResult};
use crate::host::{HostCapabilities, NativeHostCapabilities};
use crate::language::{AdapterRegistry, EXTENSION_TABLE};
use crate::node::{ASTResult, ExtractionConfig};
use crate::scheduler::{self, RunReport};
use crate::taxonomy;

/// Named-parameter bundle for `read_ast`, mirroring the SQL surface's
/// optional arguments exactly (defaults match §6).
#[derive(Clone, Debug)]
pub struct ReadAstOptions {
    pub language: Option<String>,
    pub ignore_errors: bool,
    pub peek_size: i32,
    pub peek_mode: String,
    pub worker_count: Option<u32>,
}

impl Default for ReadAstOptions {
    fn default() -> Self {
        ReadAstOptions {
            language: None,
            ignore_errors: false,
            peek_size: 120,
            peek_mode: "auto".to_string(),
            worker_count: None,
        }
    }
}

/// `read_ast(paths[, language], ...)`. `patterns` accepts literal paths,
/// globs, or directories; each file resolves its language independently even
/// when a list of patterns is given — a binder error is raised only if zero
/// files across the whole set resolve to a known language.
///
/// Uses `NativeHostCapabilities` (std::fs + a dedicated rayon pool sized to
/// `options.worker_count`). An embedding host that wants to supply its own
/// filesystem/thread pool should call [`read_ast_with_host`] directly.
pub fn read_ast(patterns: &[String], options: ReadAstOptions) -> EngineResult<(Vec<ASTResult>, RunReport)> {
    let worker_count = options
        .worker_count
        .unwrap_or_else(|| EngineConfig::default().parallel_workers);
    let host = NativeHostCapabilities::new(worker_count);
    read_ast_with_host(patterns, options, &host)
}

/// Same as [`read_ast`], taking an explicit host capability set instead of
/// building a `NativeHostCapabilities` internally — the seam a real
/// embedding uses to substitute its own thread pool and virtual filesystem.
pub fn read_ast_with_host(
    patterns: &[String],
    options: ReadAstOptions,
    host: &dyn HostCapabilities,
) -> EngineResult<(Vec<ASTResult>, RunReport)> {
    if patterns.is_empty() {
        return Err(EngineError::binder("read_ast requires at least one path pattern"));
    }

    info!(pattern_count = patterns.len(), "read_ast invoked");
    let files = scheduler::expand_patterns(patterns)?;
    if files.is_empty() {
        warn!(?patterns, "read_ast pattern set matched no files");
        if options.ignore_errors {
            return Ok((Vec::new(), RunReport::default()));
        }
        return Err(EngineError::io(
            patterns[0].clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "pattern set matched no files"),
        ));
    }

    let config = ExtractionConfig::from_peek_mode(&options.peek_mode, options.peek_size);
    scheduler::run(&files, options.language.as_deref(), options.ignore_errors, config, host)
}

/// `parse_ast(code, language)` — parses one in-memory string, no filesystem
/// involved. `virtual_path` is recorded on every node's `file_path` column.
pub fn parse_ast(code: &str, language: &str, virtual_path: &str, config: ExtractionConfig) -> EngineResult<ASTResult> {
    let adapter = AdapterRegistry::get().create_adapter(language)?;
    parse_source(adapter.as_ref(), code, virtual_path, config)
}

/// `ast_supported_languages()` — one row per language name the engine knows
/// about at all, per §4.3: total over the extension table in `detect.rs`
/// (naming/detection), not just the languages with a full parsing adapter.
/// Parsing a file in a recognized-but-unimplemented language still raises a
/// tolerable `Parse` error — `ast_supported_languages` only reports names.
pub fn ast_supported_languages() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = EXTENSION_TABLE.iter().map(|(language, _)| *language).collect();
    for implemented in AdapterRegistry::get().supported_languages() {
        if !names.contains(&implemented) {
            names.push(implemented);
        }
    }
    names.sort_unstable();
    names.dedup();
    names
}

/// `semantic_type_codes()` — every taxonomy code with its canonical name.
pub fn semantic_type_codes() -> Vec<(u8, &'static str)> {
    taxonomy::all_categories().collect()
}

pub fn semantic_type_to_string(code: u8) -> &'static str {
    taxonomy::name(code)
}

pub fn get_super_kind(code: u8) -> &'static str {
    taxonomy::super_kind_name(code)
}

pub fn get_kind(code: u8) -> &'static str {
    taxonomy::kind_name(code)
}

/// Reverse lookup; `None` for an unknown name (SQL surface returns NULL).
pub fn semantic_type_code(name: &str) -> Option<u8> {
    let code = taxonomy::code(name);
    if code == taxonomy::UNKNOWN_CODE {
        None
    } else {
        Some(code)
    }
}

pub fn is_semantic_type(code: u8, pattern: &str) -> bool {
    taxonomy::matches_pattern(code, pattern)
}

pub fn is_definition(code: u8) -> bool {
    taxonomy::is_definition(code)
}

pub fn is_call(code: u8) -> bool {
    taxonomy::is_call(code)
}

pub fn is_control_flow(code: u8) -> bool {
    taxonomy::is_control_flow(code)
}

pub fn is_identifier(code: u8) -> bool {
    taxonomy::is_identifier(code)
}

pub fn is_literal(code: u8) -> bool {
    taxonomy::is_literal(code)
}

pub fn is_operator(code: u8) -> bool {
    taxonomy::is_operator(code)
}

pub fn is_parser_specific(code: u8) -> bool {
    taxonomy::is_parser_specific(code)
}

pub fn is_punctuation(code: u8) -> bool {
    taxonomy::is_punctuation(code)
}

pub fn is_kind(code: u8, kind_name_query: &str) -> bool {
    taxonomy::is_kind(code, kind_name_query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_ast_rejects_empty_pattern_list() {
        let result = read_ast(&[], ReadAstOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn read_ast_with_host_accepts_an_explicit_host_capability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"x = 1\n").unwrap();

        let host = NativeHostCapabilities::new(2);
        let (results, report) =
            read_ast_with_host(&[path.to_str().unwrap().to_string()], ReadAstOptions::default(), &host).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(report.files_processed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn read_ast_parses_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"x = 1\n").unwrap();

        let (results, report) = read_ast(&[path.to_str().unwrap().to_string()], ReadAstOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(report.files_processed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn parse_ast_parses_inline_source() {
        let result = parse_ast("fn main() {}", "rust", "<inline>", ExtractionConfig::default()).unwrap();
        assert!(!result.nodes.is_empty());
        assert_eq!(result.source.language, "rust");
    }

    #[test]
    fn ast_supported_languages_includes_all_adapters() {
        let langs = ast_supported_languages();
        for expected in ["python", "rust", "javascript", "typescript", "java", "c", "cpp", "csharp", "go", "ruby", "bash"] {
            assert!(langs.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn ast_supported_languages_also_reports_recognized_but_unimplemented_languages() {
        let langs = ast_supported_languages();
        for recognized_only in ["json", "css", "sql", "markdown", "swift", "kotlin", "lua", "hcl", "graphql", "toml", "php", "html", "r"] {
            assert!(langs.contains(&recognized_only), "missing {recognized_only}");
        }
        assert!(langs.len() >= 24);
    }

    #[test]
    fn ast_supported_languages_is_sorted_and_deduplicated() {
        let langs = ast_supported_languages();
        let mut sorted = langs.clone();
        sorted.sort_unstable();
        assert_eq!(langs, sorted);
        let mut deduped = langs.clone();
        deduped.dedup();
        assert_eq!(langs, deduped);
    }

    #[test]
    fn semantic_type_round_trip() {
        let code = semantic_type_code("DEFINITION_FUNCTION").unwrap();
        assert_eq!(semantic_type_to_string(code), "DEFINITION_FUNCTION");
        assert!(is_definition(code));
    }

    #[test]
    fn semantic_type_code_unknown_name_is_none() {
        assert_eq!(semantic_type_code("NOT_A_CATEGORY"), None);
    }

    #[test]
    fn scenario_b_cross_language_definitions_and_calls() {
        let rust = parse_ast(
            "fn main() { println!(\"x\"); }",
            "rust",
            "<inline>",
            ExtractionConfig::default(),
        )
        .unwrap();
        let python = parse_ast("def main():\n    print(\"x\")\n", "python", "<inline>", ExtractionConfig::default()).unwrap();

        for result in [&rust, &python] {
            let has_main_def = result
                .nodes
                .iter()
                .any(|n| is_definition(n.semantic_type) && n.name.as_deref() == Some("main"));
            assert!(has_main_def, "{} missing main definition", result.source.language);
            let has_call = result.nodes.iter().any(|n| is_call(n.semantic_type));
            assert!(has_call, "{} missing a call node", result.source.language);
        }
    }
}
