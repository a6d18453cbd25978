use std::collections::HashMap;
use std::sync::OnceLock;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::flags;
use crate::taxonomy::code as t;

pub struct CSharpAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("compilation_unit", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert("class_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("interface_declaration", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("method_declaration", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("property_declaration", NodeConfig::new(t("DEFINITION_VARIABLE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("invocation_expression", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::None, Strategy::None, 0));
        m.insert("member_access_expression", NodeConfig::new(t("COMPUTATION_MEMBER_ACCESS"), Strategy::None, Strategy::None, 0));
        m.insert("assignment_expression", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("binary_expression", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("predefined_type", NodeConfig::new(t("TYPE_PRIMITIVE"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string_literal", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("integer_literal", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("if_statement", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("for_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("while_statement", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return_statement", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("try_statement", NodeConfig::new(t("ERROR_TRY"), Strategy::None, Strategy::None, 0));
        m.insert("catch_clause", NodeConfig::new(t("ERROR_CATCH"), Strategy::None, Strategy::None, 0));
        m.insert("throw_statement", NodeConfig::new(t("ERROR_THROW"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("using_directive", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("namespace_declaration", NodeConfig::new(t("ORGANIZATION_NAMESPACE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("block", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for CSharpAdapter {
    fn language_name(&self) -> &'static str {
        "csharp"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cs", "c#"]
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("csharp grammar load failed: {e}")))?;
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
        assert!(CSharpAdapter.new_parser().is_ok());
    }
}
