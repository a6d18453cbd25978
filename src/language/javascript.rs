use std::collections::HashMap;
use std::sync::OnceLock;

use tree_sitter::Node as TsNode;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::flags;
use crate::taxonomy::code as t;

pub struct JavaScriptAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("program", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert(
            "function_declaration",
            NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0),
        );
        m.insert(
            "method_definition",
            NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindProperty, Strategy::None, 0),
        );
        m.insert(
            "class_declaration",
            NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0),
        );
        m.insert(
            "variable_declarator",
            NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::FindIdentifier, Strategy::None, 0),
        );
        m.insert(
            "arrow_function",
            NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::None, Strategy::None, 0),
        );
        m.insert("call_expression", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("member_expression", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::FindProperty, Strategy::None, 0));
        m.insert("subscript_expression", NodeConfig::new(t("COMPUTATION_INDEX"), Strategy::None, Strategy::None, 0));
        m.insert("assignment_expression", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::FindAssignmentTarget, Strategy::None, 0));
        m.insert("binary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("unary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("property_identifier", NodeConfig::new(t("NAME_QUALIFIED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("number", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("true", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("false", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("null", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("undefined", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("if_statement", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("for_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("while_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("switch_statement", NodeConfig::new(t("FLOW_SWITCH"), Strategy::None, Strategy::None, 0));
        m.insert("return_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("break_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("continue_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("try_statement", NodeConfig::new(t("ERROR_TRY"), Strategy::None, Strategy::None, 0));
        m.insert("catch_clause", NodeConfig::new(t("ERROR_CATCH"), Strategy::None, Strategy::None, 0));
        m.insert("finally_clause", NodeConfig::new(t("ERROR_FINALLY"), Strategy::None, Strategy::None, 0));
        m.insert("throw_statement", NodeConfig::new(t("ERROR_THROW"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("import_statement", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("export_statement", NodeConfig::new(t("ORGANIZATION_EXPORT"), Strategy::None, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("statement_block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m.insert("expression_statement", NodeConfig::new(t("EXECUTION_EXPRESSION_STATEMENT"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for JavaScriptAdapter {
    fn language_name(&self) -> &'static str {
        "javascript"
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("javascript grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }

    fn extract_name(&self, node: TsNode, source: &str) -> Option<String> {
        if node.kind() == "assignment_expression" {
            let mut cursor = node.walk();
            return node
                .children(&mut cursor)
                .next()
                .filter(|c| c.kind() == "identifier")
                .and_then(|c| super::node_text(c, source));
        }
        super::default_extract_name(node, source, self.config_for(node.kind()).name_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_builds() {
        assert!(JavaScriptAdapter.new_parser().is_ok());
    }
}
