//! End-to-end exercises of the SQL-surface scenarios, driven through the
//! public `ast_query_engine` crate API rather than its internal modules.

use std::fs;
use std::io::Write;

use ast_query_engine::node::ExtractionConfig;
use ast_query_engine::operators::{ast_supported_languages, parse_ast, read_ast, semantic_type_code, semantic_type_to_string, ReadAstOptions};
use ast_query_engine::operators::{is_call, is_definition};
use ast_query_engine::EngineError;

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

/// Scenario A — descendant range: a node's descendants form a contiguous
/// `[node_id+1, node_id+descendant_count]` range in the flat pre-order table.
#[test]
fn scenario_a_descendant_range() {
    let result = parse_ast("def f():\n    return 1\n", "python", "<inline>", ExtractionConfig::default()).unwrap();

    assert_eq!(result.nodes[0].node_id, 0);
    assert!(result.nodes[0].descendant_count >= 4);

    let f = result
        .nodes
        .iter()
        .find(|n| n.type_raw == "function_definition")
        .expect("function_definition node");
    assert_eq!(f.name.as_deref(), Some("f"));

    let f_index = result.nodes.iter().position(|n| n.node_id == f.node_id).unwrap();
    assert_eq!(f.descendant_count, (result.nodes.len() - f_index - 1) as u32);

    let in_range = result
        .nodes
        .iter()
        .filter(|n| n.node_id > f.node_id && n.node_id <= f.node_id + f.descendant_count as u64)
        .count();
    assert_eq!(in_range as u32, f.descendant_count);
}

/// Scenario B — semantic types are cross-language: equivalent `main`
/// definitions and calls classify identically in Rust and Python.
#[test]
fn scenario_b_semantic_types_are_cross_language() {
    let rust = parse_ast("fn main() { println!(\"x\"); }", "rust", "<inline>", ExtractionConfig::default()).unwrap();
    let python = parse_ast("def main():\n    print(\"x\")\n", "python", "<inline>", ExtractionConfig::default()).unwrap();

    for result in [&rust, &python] {
        let main_defs: Vec<_> = result
            .nodes
            .iter()
            .filter(|n| is_definition(n.semantic_type) && n.name.as_deref() == Some("main"))
            .collect();
        assert_eq!(main_defs.len(), 1, "{} should have exactly one main definition", result.source.language);

        let has_call = result.nodes.iter().any(|n| is_call(n.semantic_type));
        assert!(has_call, "{} missing a call node", result.source.language);
    }
}

/// Scenario C — peek semantics across `smart` and `custom` modes.
#[test]
fn scenario_c_peek_semantics() {
    let short_expr = format!("x = {}\n", "1".repeat(26));
    assert_eq!(short_expr.trim_end().len(), 30);
    let smart_short = ExtractionConfig::from_peek_mode("smart", 120);
    let short_result = parse_ast(&short_expr, "python", "<inline>", smart_short).unwrap();
    let assignment = short_result
        .nodes
        .iter()
        .find(|n| n.type_raw == "assignment")
        .expect("assignment node");
    let full_text = &short_expr[..short_expr.trim_end().len()];
    assert_eq!(assignment.peek.as_deref(), Some(full_text));

    let long_expr = format!("x = {}\n", "1".repeat(196));
    assert_eq!(long_expr.trim_end().len(), 200);
    let smart_long = ExtractionConfig::from_peek_mode("smart", 120);
    let long_result = parse_ast(&long_expr, "python", "<inline>", smart_long).unwrap();
    let assignment = long_result
        .nodes
        .iter()
        .find(|n| n.type_raw == "assignment")
        .expect("assignment node");
    let peek = assignment.peek.as_deref().expect("peek present");
    assert!(peek.len() <= 83);
    assert!(peek.ends_with("..."));

    let custom = ExtractionConfig::from_peek_mode("custom", 10);
    let custom_result = parse_ast(&long_expr, "python", "<inline>", custom).unwrap();
    let assignment = custom_result
        .nodes
        .iter()
        .find(|n| n.type_raw == "assignment")
        .expect("assignment node");
    let peek = assignment.peek.as_deref().expect("peek present");
    assert_eq!(peek.len(), 10);
    assert!(!peek.ends_with("..."));
}

/// Scenario D — `ignore_errors` skips unresolvable/unreadable files and
/// records them without aborting the run.
#[test]
fn scenario_d_ignore_errors_skips_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let real = write_temp(&dir, "real.py", "x = 1\n");
    let missing = dir.path().join("missing.py").to_string_lossy().to_string();

    let options = ReadAstOptions {
        ignore_errors: true,
        ..ReadAstOptions::default()
    };
    let (results, report) = read_ast(&[missing, real.to_string_lossy().to_string()], options).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source.file_path, real.to_string_lossy());
    assert_eq!(report.errors_encountered.load(std::sync::atomic::Ordering::Relaxed), 1);
}

/// Scenario E — auto-detect resolves a recognized extension and raises a
/// binder error when an entire pattern set fails to resolve.
#[test]
fn scenario_e_auto_detect() {
    let dir = tempfile::tempdir().unwrap();
    let rust_file = write_temp(&dir, "a.rs", "fn main() {}\n");

    let (results, _report) = read_ast(&[rust_file.to_string_lossy().to_string()], ReadAstOptions::default()).unwrap();
    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result.source.language, "rust");
    }

    let unknown = write_temp(&dir, "data.unknownext", "whatever\n");
    let err = read_ast(&[unknown.to_string_lossy().to_string()], ReadAstOptions::default()).unwrap_err();
    assert!(matches!(err, EngineError::Binder(_)));
}

/// Scenario F — taxonomy predicates round-trip through the public operators.
#[test]
fn scenario_f_taxonomy_predicates() {
    let def_fn = semantic_type_code("DEFINITION_FUNCTION").expect("known category");
    assert_eq!(semantic_type_to_string(def_fn), "DEFINITION_FUNCTION");
    assert!(is_definition(def_fn));

    let computation_index = semantic_type_code("COMPUTATION_INDEX").expect("known category");
    assert!(!is_definition(computation_index));
}

/// A multi-language directory walk, covering several of the implemented
/// adapters in a single `read_ast` call over a directory pattern.
#[test]
fn read_ast_over_a_mixed_language_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_temp(&dir, "a.py", "def f():\n    return 1\n");
    write_temp(&dir, "b.rs", "fn main() {}\n");
    write_temp(&dir, "c.js", "function f() { return 1; }\n");

    let (results, report) = read_ast(&[dir.path().to_string_lossy().to_string()], ReadAstOptions::default()).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(report.files_processed.load(std::sync::atomic::Ordering::Relaxed), 3);

    let languages: std::collections::HashSet<_> = results.iter().map(|r| r.source.language.clone()).collect();
    assert_eq!(languages.len(), 3);
}

#[test]
fn ast_supported_languages_reports_a_broad_set() {
    let langs = ast_supported_languages();
    assert!(langs.contains(&"python"));
    assert!(langs.contains(&"json"));
    assert!(langs.len() >= 24);
}
