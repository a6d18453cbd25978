use std::collections::HashMap;
use std::sync::OnceLock;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::flags;
use crate::taxonomy::code as t;

pub struct TypeScriptAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("program", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert("function_declaration", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("method_definition", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindProperty, Strategy::None, 0));
        m.insert("class_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("interface_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("type_alias_declaration", NodeConfig::new(t("DEFINITION_MODULE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("enum_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("variable_declarator", NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("call_expression", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("member_expression", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::FindProperty, Strategy::None, 0));
        m.insert("assignment_expression", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("binary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("property_identifier", NodeConfig::new(t("NAME_QUALIFIED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("type_identifier", NodeConfig::new(t("TYPE_REFERENCE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("predefined_type", NodeConfig::new(t("TYPE_PRIMITIVE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("number", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("true", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("false", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("if_statement", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("for_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("while_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("try_statement", NodeConfig::new(t("ERROR_TRY"), Strategy::None, Strategy::None, 0));
        m.insert("catch_clause", NodeConfig::new(t("ERROR_CATCH"), Strategy::None, Strategy::None, 0));
        m.insert("throw_statement", NodeConfig::new(t("ERROR_THROW"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("import_statement", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("export_statement", NodeConfig::new(t("ORGANIZATION_EXPORT"), Strategy::None, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("statement_block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m.insert("expression_statement", NodeConfig::new(t("EXECUTION_EXPRESSION_STATEMENT"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for TypeScriptAdapter {
    fn language_name(&self) -> &'static str {
        "typescript"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ts", "tsx"]
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| EngineError::internal(format!("typescript grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_builds() {
        assert!(TypeScriptAdapter.new_parser().is_ok());
    }
}
