use std::collections::HashMap;
use std::sync::OnceLock;

use tree_sitter::Node as TsNode;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::{flags, NativeContext, Parameter};
use crate::taxonomy::code as t;

pub struct PythonAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("module", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert(
            "function_definition",
            NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::Custom, 0),
        );
        m.insert(
            "class_definition",
            NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::Custom, 0),
        );
        m.insert("call", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("attribute", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::FindProperty, Strategy::None, 0));
        m.insert("subscript", NodeConfig::new(t("COMPUTATION_INDEX"), Strategy::None, Strategy::None, 0));
        m.insert(
            "assignment",
            NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::FindAssignmentTarget, Strategy::None, 0),
        );
        m.insert("binary_operator", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("boolean_operator", NodeConfig::new(t("OPERATOR_LOGICAL"), Strategy::None, Strategy::None, 0));
        m.insert("comparison_operator", NodeConfig::new(t("OPERATOR_COMPARISON"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("integer", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("float", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("true", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("false", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("none", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("if_statement", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("for_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("while_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("break_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("continue_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("try_statement", NodeConfig::new(t("ERROR_TRY"), Strategy::None, Strategy::None, 0));
        m.insert("except_clause", NodeConfig::new(t("ERROR_CATCH"), Strategy::None, Strategy::None, 0));
        m.insert("raise_statement", NodeConfig::new(t("ERROR_THROW"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("finally_clause", NodeConfig::new(t("ERROR_FINALLY"), Strategy::None, Strategy::None, 0));
        m.insert("import_statement", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("import_from_statement", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("decorator", NodeConfig::new(t("ORGANIZATION_DECORATOR"), Strategy::None, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("parameters", NodeConfig::new(t("PATTERN_BINDING"), Strategy::None, Strategy::None, 0));
        m.insert("block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m.insert("expression_statement", NodeConfig::new(t("EXECUTION_EXPRESSION_STATEMENT"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for PythonAdapter {
    fn language_name(&self) -> &'static str {
        "python"
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("python grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }

    fn is_public(&self, node: TsNode, source: &str) -> bool {
        super::node_text(node, source)
            .map(|name| !name.starts_with('_'))
            .unwrap_or(true)
    }

    fn extract_name(&self, node: TsNode, source: &str) -> Option<String> {
        if node.kind() == "assignment" {
            let mut cursor = node.walk();
            return node
                .children(&mut cursor)
                .next()
                .filter(|c| c.kind() == "identifier")
                .and_then(|c| super::node_text(c, source));
        }
        super::default_extract_name(node, source, self.config_for(node.kind()).name_strategy)
    }

    fn extract_native(&self, node: TsNode, source: &str) -> Option<NativeContext> {
        if node.kind() != "function_definition" {
            return None;
        }
        let mut cursor = node.walk();
        let params_node = node.children(&mut cursor).find(|c| c.kind() == "parameters")?;
        let mut parameters = Vec::new();
        let mut param_cursor = params_node.walk();
        for child in params_node.children(&mut param_cursor) {
            match child.kind() {
                "identifier" => parameters.push(Parameter {
                    name: super::node_text(child, source).unwrap_or_default(),
                    type_name: String::new(),
                    default_value: None,
                    is_optional: false,
                    is_variadic: false,
                }),
                "default_parameter" => {
                    let name = super::find_child_of_kind(child, source, "identifier").unwrap_or_default();
                    parameters.push(Parameter {
                        name,
                        type_name: String::new(),
                        default_value: Some(String::new()),
                        is_optional: true,
                        is_variadic: false,
                    });
                }
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    parameters.push(Parameter {
                        name: super::node_text(child, source).unwrap_or_default(),
                        type_name: String::new(),
                        default_value: None,
                        is_optional: false,
                        is_variadic: true,
                    });
                }
                _ => {}
            }
        }
        Some(NativeContext {
            signature_kind: "function".to_string(),
            qualified_name: super::find_child_of_kind(node, source, "identifier").unwrap_or_default(),
            parameters,
            modifiers: Vec::new(),
            annotations: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_builds() {
        let adapter = PythonAdapter;
        assert!(adapter.new_parser().is_ok());
    }

    #[test]
    fn table_has_function_definition() {
        let cfg = table().get("function_definition").unwrap();
        assert_eq!(cfg.semantic_type, t("DEFINITION_FUNCTION"));
    }

    #[test]
    fn class_and_function_definitions_use_distinct_leaf_codes() {
        let function_cfg = table().get("function_definition").unwrap();
        let class_cfg = table().get("class_definition").unwrap();
        assert_ne!(function_cfg.semantic_type, class_cfg.semantic_type);
        assert_eq!(class_cfg.semantic_type, t("DEFINITION_CLASS"));
    }

    #[test]
    fn call_attribute_and_subscript_use_distinct_computation_codes() {
        let call = table().get("call").unwrap().semantic_type;
        let attribute = table().get("attribute").unwrap().semantic_type;
        let subscript = table().get("subscript").unwrap().semantic_type;
        assert_eq!(call, t("COMPUTATION_CALL"));
        assert_eq!(attribute, t("COMPUTATION_MEMBER_ACCESS"));
        assert_eq!(subscript, t("COMPUTATION_INDEX"));
        assert_ne!(call, attribute);
        assert_ne!(call, subscript);
        assert_ne!(attribute, subscript);
    }
}
