//! Language adapters: one per supported grammar, each a parser factory plus
//! an immutable node-config table and a handful of extraction routines.

mod bash;
mod c_lang;
mod cpp;
mod csharp;
mod detect;
mod go_lang;
mod java;
mod javascript;
mod python;
mod registry;
mod ruby;
mod rust_lang;
mod typescript;

pub use detect::{detect_language, extension_for_language, EXTENSION_TABLE};
pub use registry::{AdapterRegistry, REGISTRY};

use std::collections::HashMap;

use tree_sitter::Node as TsNode;

use crate::error::{EngineError, EngineResult};
use crate::node::NativeContext;

/// How a node's display name or literal value is pulled out of its subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionStrategy {
    None,
    NodeText,
    FirstChild,
    FindIdentifier,
    FindProperty,
    FindAssignmentTarget,
    Custom,
}

/// Per-raw-grammar-node-name configuration, looked up once per node in the
/// parse engine's hot loop.
#[derive(Clone, Copy, Debug)]
pub struct NodeConfig {
    pub semantic_type: u8,
    pub name_strategy: ExtractionStrategy,
    pub native_strategy: ExtractionStrategy,
    pub flags: u8,
}

impl NodeConfig {
    pub const fn new(
        semantic_type: u8,
        name_strategy: ExtractionStrategy,
        native_strategy: ExtractionStrategy,
        flags: u8,
    ) -> Self {
        NodeConfig {
            semantic_type,
            name_strategy,
            native_strategy,
            flags,
        }
    }
}

/// Fallback used when a raw grammar node name is absent from a language's
/// table: `PARSER_CONSTRUCT`, no extraction, no flags.
pub const DEFAULT_CONFIG: NodeConfig = NodeConfig::new(
    0, // taxonomy::code("PARSER_CONSTRUCT") is not const-evaluable here; 0 is its code.
    ExtractionStrategy::None,
    ExtractionStrategy::None,
    0,
);

/// Suffix-based classification, used only when a raw name is missing from
/// the language's explicit table. Never overrides an explicit entry. Picks
/// the most common leaf category for the kind implied by the suffix; an
/// adapter that needs a more specific leaf lists the node explicitly.
pub fn classify_by_suffix(raw_name: &str) -> Option<u8> {
    use crate::taxonomy::code;

    if raw_name.ends_with("_declaration") || raw_name.ends_with("_definition") {
        Some(code("DEFINITION_VARIABLE"))
    } else if raw_name.ends_with("_expression") {
        Some(code("COMPUTATION_CALL"))
    } else if raw_name.ends_with("_statement") {
        Some(code("EXECUTION_STATEMENT"))
    } else if raw_name == "identifier" || raw_name.ends_with("_identifier") {
        Some(code("NAME_IDENTIFIER"))
    } else {
        None
    }
}

pub fn lookup_config(table: &HashMap<&'static str, NodeConfig>, raw_name: &str) -> NodeConfig {
    if let Some(cfg) = table.get(raw_name) {
        return *cfg;
    }
    match classify_by_suffix(raw_name) {
        Some(semantic_type) => NodeConfig::new(
            semantic_type,
            ExtractionStrategy::None,
            ExtractionStrategy::None,
            0,
        ),
        None => DEFAULT_CONFIG,
    }
}

/// The capability set a language adapter provides. Each file gets a fresh
/// adapter instance; only `node_configs()`'s underlying table is shared
/// (immutable, built once).
pub trait LanguageAdapter: Send {
    fn language_name(&self) -> &'static str;
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
    fn new_parser(&self) -> EngineResult<tree_sitter::Parser>;
    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig>;

    fn config_for(&self, raw_name: &str) -> NodeConfig {
        lookup_config(self.node_configs(), raw_name)
    }

    fn normalized_type(&self, raw_name: &str) -> &'static str {
        crate::taxonomy::name(self.config_for(raw_name).semantic_type)
    }

    fn extract_name(&self, node: TsNode, source: &str) -> Option<String> {
        default_extract_name(node, source, self.config_for(node.kind()).name_strategy)
    }

    fn extract_value(&self, node: TsNode, source: &str) -> Option<String> {
        default_extract_name(node, source, self.config_for(node.kind()).native_strategy)
    }

    fn is_public(&self, _node: TsNode, _source: &str) -> bool {
        false
    }

    /// Populates the `native` record. Default: none. Overridden by adapters
    /// with a `Custom` native strategy for function-like nodes.
    fn extract_native(&self, _node: TsNode, _source: &str) -> Option<NativeContext> {
        None
    }
}

/// Shared strategy interpreter for `NodeText` / `FirstChild` / `FindIdentifier`
/// / `FindProperty`. `FindAssignmentTarget` and `Custom` are language-specific
/// and left to each adapter's override of `extract_name`/`extract_value`.
pub fn default_extract_name(node: TsNode, source: &str, strategy: ExtractionStrategy) -> Option<String> {
    match strategy {
        ExtractionStrategy::None | ExtractionStrategy::Custom | ExtractionStrategy::FindAssignmentTarget => None,
        ExtractionStrategy::NodeText => node_text(node, source),
        ExtractionStrategy::FirstChild => {
            let mut cursor = node.walk();
            let result = node.children(&mut cursor).next().and_then(|c| node_text(c, source));
            result
        }
        ExtractionStrategy::FindIdentifier => find_child_of_kind(node, source, "identifier"),
        ExtractionStrategy::FindProperty => find_child_of_kind(node, source, "property_identifier"),
    }
}

pub fn node_text(node: TsNode, source: &str) -> Option<String> {
    let bytes = source.as_bytes();
    let start = node.start_byte().min(bytes.len());
    let end = node.end_byte().min(bytes.len());
    if start >= end {
        return None;
    }
    Some(crate::node::sanitize_utf8(&bytes[start..end]))
}

pub fn find_child_of_kind(node: TsNode, source: &str, kind: &str) -> Option<String> {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor)
        .find(|c| c.kind() == kind)
        .and_then(|c| node_text(c, source));
    result
}

pub fn unsupported_language(language: &str) -> EngineError {
    EngineError::parse(None, language, "no parser registered for language")
}
