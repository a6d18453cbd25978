//! Single-file parse engine: tree-sitter parse plus a non-recursive, two-phase
//! depth-first materialization into a flat, pre-order `ASTResult`.
//!
//! The stack carries `Visit` and `Finalize` frames. A `Visit` frame
//! materializes its node, pushes its children (right-to-left, so they pop in
//! left-to-right order) and pushes its own `Finalize` frame underneath them.
//! A `Finalize` frame fires only after every descendant has been popped and
//! materialized, at which point `nodes.len() - materialized_index - 1` is
//! exactly the descendant count (the DFS pre-order invariant `children ⊆
//! [node_id+1, node_id+descendant_count]` falls out of this for free).

use std::time::Instant;

use tracing::debug;
use tree_sitter::Node as TsNode;

use crate::error::{EngineError, EngineResult};
use crate::language::LanguageAdapter;
use crate::node::{
    arity_bin, compute_peek, flags, sanitize_utf8, ASTNode, ASTResult, ContextLevel,
    ExtractionConfig, NativeContext, SourceInfo, SourceLevel, StructureLevel,
};

enum Frame<'a> {
    Visit {
        node: TsNode<'a>,
        parent_id: i64,
        depth: u32,
        sibling_index: u32,
    },
    Finalize {
        materialized_index: usize,
    },
}

/// Parses one file's source text and returns its flat node table.
///
/// `file_path` is recorded verbatim on every node (never re-resolved); the
/// caller (scheduler) is responsible for path normalization.
pub fn parse_source(
    adapter: &dyn LanguageAdapter,
    source: &str,
    file_path: &str,
    config: ExtractionConfig,
) -> EngineResult<ASTResult> {
    let start = Instant::now();
    let mut parser = adapter.new_parser()?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| EngineError::parse(Some(file_path.into()), adapter.language_name(), "tree-sitter returned no tree"))?;

    let root = tree.root_node();
    let mut nodes: Vec<ASTNode> = Vec::new();
    let mut max_depth: u32 = 0;
    let mut stack: Vec<Frame> = vec![Frame::Visit {
        node: root,
        parent_id: -1,
        depth: 0,
        sibling_index: 0,
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Finalize { materialized_index } => {
                if config.structure >= StructureLevel::Full {
                    let descendant_count = (nodes.len() - materialized_index - 1) as u32;
                    nodes[materialized_index].descendant_count = descendant_count;
                }
            }
            Frame::Visit {
                node,
                parent_id,
                depth,
                sibling_index,
            } => {
                max_depth = max_depth.max(depth);
                let materialized_index = nodes.len();
                let node_id = materialized_index as u64;

                let ast_node = materialize_node(
                    adapter,
                    node,
                    source,
                    file_path,
                    node_id,
                    parent_id,
                    depth,
                    sibling_index,
                    config,
                );
                nodes.push(ast_node);
                stack.push(Frame::Finalize { materialized_index });

                let child_count = node.child_count();
                for i in (0..child_count).rev() {
                    if let Some(child) = node.child(i) {
                        stack.push(Frame::Visit {
                            node: child,
                            parent_id: node_id as i64,
                            depth: depth + 1,
                            sibling_index: i as u32,
                        });
                    }
                }
            }
        }
    }

    let parse_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    let node_count = nodes.len() as u32;
    debug!(
        file_path,
        language = adapter.language_name(),
        node_count,
        max_depth,
        parse_time_ms,
        "parsed file"
    );

    Ok(ASTResult {
        source: SourceInfo {
            file_path: file_path.to_string(),
            language: adapter.language_name().to_string(),
        },
        nodes,
        parse_time_ms,
        node_count,
        max_depth,
    })
}

#[allow(clippy::too_many_arguments)]
fn materialize_node(
    adapter: &dyn LanguageAdapter,
    node: TsNode,
    source: &str,
    file_path: &str,
    node_id: u64,
    parent_id: i64,
    depth: u32,
    sibling_index: u32,
    config: ExtractionConfig,
) -> ASTNode {
    let raw_name = node.kind();
    let node_config = adapter.config_for(raw_name);
    let start = node.start_position();
    let end = node.end_position();
    let full_child_count = node.child_count() as u32;

    let (out_file_path, out_language) = if config.source >= SourceLevel::Path {
        (file_path.to_string(), adapter.language_name().to_string())
    } else {
        (String::new(), String::new())
    };

    let (start_line, end_line, start_column, end_column) = if config.source >= SourceLevel::LinesOnly {
        let (start_column, end_column) = if config.source >= SourceLevel::Full {
            (start.column as u32, end.column as u32)
        } else {
            (0, 0)
        };
        (start.row as u32, end.row as u32, start_column, end_column)
    } else {
        (0, 0, 0, 0)
    };

    let (out_parent_id, out_depth, out_sibling_index) = if config.structure >= StructureLevel::Minimal {
        (parent_id, depth, sibling_index)
    } else {
        (-1, 0, 0)
    };

    let children_count = if config.structure >= StructureLevel::Full {
        full_child_count
    } else {
        0
    };

    let name = if config.context >= ContextLevel::Normalized {
        adapter.extract_name(node, source)
    } else {
        None
    };

    let peek = match config.peek {
        crate::node::PeekLevel::None => None,
        level => node_text_for_peek(node, source).map(|text| compute_peek(&text, level)),
    };

    let (semantic_type, universal_flags, arity_bin_value, type_normalized) = if config.context >= ContextLevel::NodeTypesOnly {
        let mut universal_flags = node_config.flags;
        if universal_flags & flags::IS_KEYWORD_IF_LEAF != 0 {
            universal_flags &= !flags::IS_KEYWORD_IF_LEAF;
            if full_child_count == 0 {
                universal_flags |= flags::IS_KEYWORD;
            }
        }
        if adapter.is_public(node, source) {
            universal_flags |= flags::IS_PUBLIC;
        }
        (
            node_config.semantic_type,
            universal_flags,
            arity_bin(full_child_count),
            adapter.normalized_type(raw_name).to_string(),
        )
    } else {
        (0, 0, 0, String::new())
    };

    let native: Option<NativeContext> = if matches!(config.context, ContextLevel::Native) {
        adapter.extract_native(node, source)
    } else {
        None
    };

    ASTNode {
        node_id,
        type_raw: raw_name.to_string(),
        type_normalized,
        name,
        file_path: out_file_path,
        language: out_language,
        start_line,
        start_column,
        end_line,
        end_column,
        parent_id: out_parent_id,
        depth: out_depth,
        sibling_index: out_sibling_index,
        children_count,
        descendant_count: 0, // filled by the matching Finalize frame, if structure allows it
        semantic_type,
        universal_flags,
        arity_bin: arity_bin_value,
        peek,
        native,
    }
}

fn node_text_for_peek(node: TsNode, source: &str) -> Option<String> {
    let bytes = source.as_bytes();
    let start = node.start_byte().min(bytes.len());
    let end = node.end_byte().min(bytes.len());
    if start >= end {
        return None;
    }
    Some(sanitize_utf8(&bytes[start..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::AdapterRegistry;

    fn parse(language: &str, source: &str) -> ASTResult {
        let adapter = AdapterRegistry::get().create_adapter(language).unwrap();
        parse_source(adapter.as_ref(), source, "test.src", ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn root_node_has_no_parent() {
        let result = parse("python", "x = 1\n");
        assert_eq!(result.nodes[0].parent_id, -1);
        assert_eq!(result.nodes[0].depth, 0);
    }

    #[test]
    fn descendant_count_matches_subtree_size() {
        let result = parse("python", "def f(x):\n    return x + 1\n");
        let root = &result.nodes[0];
        assert_eq!(root.descendant_count as usize, result.nodes.len() - 1);
    }

    #[test]
    fn node_ids_are_preorder_dfs() {
        let result = parse("python", "if True:\n    pass\n");
        for (i, node) in result.nodes.iter().enumerate() {
            assert_eq!(node.node_id, i as u64);
            if node.parent_id >= 0 {
                assert!((node.parent_id as u64) < node.node_id);
            }
        }
    }

    #[test]
    fn descendant_range_is_contiguous_and_exclusive_of_siblings() {
        let result = parse("python", "def a():\n    pass\n\ndef b():\n    pass\n");
        let root_id = result.nodes[0].node_id;
        let range = result.descendant_range(root_id);
        assert_eq!(*range.end() as usize, result.nodes.len() - 1);
    }

    #[test]
    fn children_count_and_arity_bin_are_consistent() {
        let result = parse("python", "f(1, 2, 3, 4, 5)\n");
        for node in &result.nodes {
            if node.children_count == 0 {
                assert_eq!(node.arity_bin, 0);
            }
        }
    }

    #[test]
    fn max_depth_tracks_deepest_node() {
        let result = parse("python", "if True:\n    if True:\n        pass\n");
        let actual_max = result.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        assert_eq!(result.max_depth, actual_max);
    }

    #[test]
    fn context_none_zeroes_semantic_fields_but_keeps_structure() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            context: ContextLevel::None,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "def f():\n    pass\n", "t.py", config).unwrap();
        for node in &result.nodes {
            assert_eq!(node.semantic_type, 0);
            assert_eq!(node.universal_flags, 0);
            assert_eq!(node.arity_bin, 0);
            assert!(node.type_normalized.is_empty());
            assert!(node.name.is_none());
        }
        // structure is unaffected by context level
        assert!(result.nodes[0].descendant_count > 0);
    }

    #[test]
    fn context_node_types_only_skips_name_but_keeps_semantic_type() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            context: ContextLevel::NodeTypesOnly,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "def f():\n    pass\n", "t.py", config).unwrap();
        let def_node = result.nodes.iter().find(|n| n.type_raw == "function_definition").unwrap();
        assert!(def_node.name.is_none());
        assert_ne!(def_node.semantic_type, 0);
    }

    #[test]
    fn structure_none_forces_flat_defaults() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            structure: StructureLevel::None,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "x = 1\ny = 2\n", "t.py", config).unwrap();
        for node in &result.nodes {
            assert_eq!(node.parent_id, -1);
            assert_eq!(node.depth, 0);
            assert_eq!(node.sibling_index, 0);
            assert_eq!(node.children_count, 0);
            assert_eq!(node.descendant_count, 0);
        }
    }

    #[test]
    fn structure_minimal_keeps_parentage_but_not_counts() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            structure: StructureLevel::Minimal,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "x = 1\ny = 2\n", "t.py", config).unwrap();
        let child = result.nodes.iter().find(|n| n.depth > 0).unwrap();
        assert!(child.parent_id >= 0);
        for node in &result.nodes {
            assert_eq!(node.children_count, 0);
            assert_eq!(node.descendant_count, 0);
        }
    }

    #[test]
    fn source_path_level_keeps_identity_but_drops_positions() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            source: SourceLevel::Path,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "x = 1\n", "t.py", config).unwrap();
        for node in &result.nodes {
            assert_eq!(node.file_path, "t.py");
            assert_eq!(node.language, "python");
            assert_eq!(node.start_line, 0);
            assert_eq!(node.start_column, 0);
        }
    }

    #[test]
    fn source_lines_only_keeps_lines_but_drops_columns() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            source: SourceLevel::LinesOnly,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "x = 1\ny = 2\n", "t.py", config).unwrap();
        let second_line_node = result.nodes.iter().find(|n| n.start_line == 1).unwrap();
        assert_eq!(second_line_node.start_column, 0);
    }

    #[test]
    fn source_none_blanks_path_and_language() {
        let adapter = AdapterRegistry::get().create_adapter("python").unwrap();
        let config = ExtractionConfig {
            source: SourceLevel::None,
            ..ExtractionConfig::default()
        };
        let result = parse_source(adapter.as_ref(), "x = 1\n", "t.py", config).unwrap();
        assert!(result.nodes[0].file_path.is_empty());
        assert!(result.nodes[0].language.is_empty());
    }
}
