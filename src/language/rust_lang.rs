use std::collections::HashMap;
use std::sync::OnceLock;

use tree_sitter::Node as TsNode;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::{flags, NativeContext, Parameter};
use crate::taxonomy::code as t;

pub struct RustAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("source_file", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert(
            "function_item",
            NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::Custom, 0),
        );
        m.insert("struct_item", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("enum_item", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("trait_item", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("impl_item", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::None, Strategy::None, 0));
        m.insert("mod_item", NodeConfig::new(t("DEFINITION_MODULE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("let_declaration", NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::None, Strategy::None, 0));
        m.insert("call_expression", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("macro_invocation", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("field_expression", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::FindProperty, Strategy::None, 0));
        m.insert("index_expression", NodeConfig::new(t("COMPUTATION_INDEX"), Strategy::None, Strategy::None, 0));
        m.insert("assignment_expression", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("binary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("unary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("field_identifier", NodeConfig::new(t("NAME_QUALIFIED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("type_identifier", NodeConfig::new(t("TYPE_REFERENCE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("primitive_type", NodeConfig::new(t("TYPE_PRIMITIVE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string_literal", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("integer_literal", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("float_literal", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("boolean_literal", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::NodeText, Strategy::None, flags::IS_KEYWORD));
        m.insert("if_expression", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("match_expression", NodeConfig::new(t("FLOW_SWITCH"), Strategy::None, Strategy::None, 0));
        m.insert("for_expression", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("while_expression", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("loop_expression", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return_expression", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("break_expression", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("continue_expression", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("unsafe_block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, flags::IS_UNSAFE));
        m.insert("use_declaration", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("attribute_item", NodeConfig::new(t("METADATA_ATTRIBUTE"), Strategy::None, Strategy::None, 0));
        m.insert("line_comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("block_comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m.insert("expression_statement", NodeConfig::new(t("EXECUTION_EXPRESSION_STATEMENT"), Strategy::None, Strategy::None, 0));
        m.insert("visibility_modifier", NodeConfig::new(t("METADATA_ATTRIBUTE"), Strategy::NodeText, Strategy::None, flags::IS_KEYWORD));
        m
    })
}

impl LanguageAdapter for RustAdapter {
    fn language_name(&self) -> &'static str {
        "rust"
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("rust grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }

    fn is_public(&self, node: TsNode, _source: &str) -> bool {
        let mut cursor = node.walk();
        let result = node.children(&mut cursor).any(|c| c.kind() == "visibility_modifier");
        result
    }

    fn extract_native(&self, node: TsNode, source: &str) -> Option<NativeContext> {
        if node.kind() != "function_item" {
            return None;
        }
        let mut cursor = node.walk();
        let params_node = node.children(&mut cursor).find(|c| c.kind() == "parameters")?;
        let mut parameters = Vec::new();
        let mut param_cursor = params_node.walk();
        for child in params_node.children(&mut param_cursor) {
            if child.kind() != "parameter" && child.kind() != "self_parameter" {
                continue;
            }
            let name = super::find_child_of_kind(child, source, "identifier")
                .unwrap_or_else(|| super::node_text(child, source).unwrap_or_default());
            let type_name = child
                .child_by_field_name("type")
                .and_then(|t| super::node_text(t, source))
                .unwrap_or_default();
            parameters.push(Parameter {
                name,
                type_name,
                default_value: None,
                is_optional: false,
                is_variadic: false,
            });
        }
        let is_unsafe = {
            let mut cursor = node.walk();
            let result = node.children(&mut cursor).any(|c| c.kind() == "function_modifiers");
            result
        };
        Some(NativeContext {
            signature_kind: "function".to_string(),
            qualified_name: super::find_child_of_kind(node, source, "identifier").unwrap_or_default(),
            parameters,
            modifiers: if is_unsafe { vec!["unsafe".to_string()] } else { Vec::new() },
            annotations: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_builds() {
        assert!(RustAdapter.new_parser().is_ok());
    }
}
