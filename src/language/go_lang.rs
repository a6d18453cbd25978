use std::collections::HashMap;
use std::sync::OnceLock;

use tree_sitter::Node as TsNode;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::flags;
use crate::taxonomy::code as t;

pub struct GoAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("source_file", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert("function_declaration", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("method_declaration", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("type_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::None, Strategy::None, 0));
        m.insert("const_declaration", NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::None, Strategy::None, 0));
        m.insert("var_declaration", NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::None, Strategy::None, 0));
        m.insert("call_expression", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("selector_expression", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::None, Strategy::None, 0));
        m.insert("assignment_statement", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("binary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("field_identifier", NodeConfig::new(t("NAME_QUALIFIED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("type_identifier", NodeConfig::new(t("TYPE_REFERENCE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("interpreted_string_literal", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("int_literal", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("if_statement", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("for_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("go_statement", NodeConfig::new(t("EXECUTION_STATEMENT"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("defer_statement", NodeConfig::new(t("EXECUTION_STATEMENT"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("import_declaration", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("package_clause", NodeConfig::new(t("ORGANIZATION_NAMESPACE"), Strategy::None, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for GoAdapter {
    fn language_name(&self) -> &'static str {
        "go"
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("go grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }

    fn is_public(&self, node: TsNode, source: &str) -> bool {
        super::node_text(node, source)
            .and_then(|n| n.chars().next())
            .map(|c| c.is_uppercase())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_builds() {
        assert!(GoAdapter.new_parser().is_ok());
    }
}
