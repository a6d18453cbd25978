use std::collections::HashMap;
use std::sync::OnceLock;

use super::{ExtractionStrategy as Strategy, LanguageAdapter, NodeConfig};
use crate::error::{EngineError, EngineResult};
use crate::node::flags;
use crate::taxonomy::code as t;

pub struct RubyAdapter;

fn table() -> &'static HashMap<&'static str, NodeConfig> {
    static TABLE: OnceLock<HashMap<&'static str, NodeConfig>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("program", NodeConfig::new(t("EXECUTION_PROGRAM"), Strategy::None, Strategy::None, 0));
        m.insert("method", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("singleton_method", NodeConfig::new(t("DEFINITION_FUNCTION"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("class", NodeConfig::new(t("DEFINITION_CLASS"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("module", NodeConfig::new(t("DEFINITION_MODULE"), Strategy::FindIdentifier, Strategy::None, 0));
        m.insert("assignment", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("operator_assignment", NodeConfig::new(t("OPERATOR_ASSIGNMENT"), Strategy::None, Strategy::None, 0));
        m.insert("binary", NodeConfig::new(t("OPERATOR_ARITHMETIC"), Strategy::None, Strategy::None, 0));
        m.insert("call", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("method_call", NodeConfig::new(t("COMPUTATION_CALL"), Strategy::FirstChild, Strategy::None, 0));
        m.insert("identifier", NodeConfig::new(t("NAME_IDENTIFIER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("constant", NodeConfig::new(t("NAME_QUALIFIED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("instance_variable", NodeConfig::new(t("NAME_SCOPED"), Strategy::NodeText, Strategy::None, 0));
        m.insert("string", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("integer", NodeConfig::new(t("LITERAL_NUMBER"), Strategy::NodeText, Strategy::None, 0));
        m.insert("symbol", NodeConfig::new(t("LITERAL_STRING"), Strategy::NodeText, Strategy::None, 0));
        m.insert("true", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("false", NodeConfig::new(t("LITERAL_BOOLEAN"), Strategy::None, Strategy::None, flags::IS_KEYWORD));
        m.insert("if", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("unless", NodeConfig::new(t("FLOW_CONDITIONAL"), Strategy::None, Strategy::None, 0));
        m.insert("while", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("for", NodeConfig::new(t("FLOW_LOOP"), Strategy::None, Strategy::None, 0));
        m.insert("return", NodeConfig::new(t("FLOW_JUMP"), Strategy::None, Strategy::None, flags::IS_KEYWORD_IF_LEAF));
        m.insert("begin", NodeConfig::new(t("ERROR_TRY"), Strategy::None, Strategy::None, 0));
        m.insert("rescue", NodeConfig::new(t("ERROR_CATCH"), Strategy::None, Strategy::None, 0));
        m.insert("ensure", NodeConfig::new(t("ERROR_FINALLY"), Strategy::None, Strategy::None, 0));
        m.insert("require", NodeConfig::new(t("ORGANIZATION_IMPORT"), Strategy::None, Strategy::None, 0));
        m.insert("comment", NodeConfig::new(t("METADATA_COMMENT"), Strategy::NodeText, Strategy::None, 0));
        m.insert("body_statement", NodeConfig::new(t("EXECUTION_BLOCK"), Strategy::None, Strategy::None, 0));
        m
    })
}

impl LanguageAdapter for RubyAdapter {
    fn language_name(&self) -> &'static str {
        "ruby"
    }

    fn new_parser(&self) -> EngineResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .map_err(|e| EngineError::internal(format!("ruby grammar load failed: {e}")))?;
        Ok(parser)
    }

    fn node_configs(&self) -> &'static HashMap<&'static str, NodeConfig> {
        table()
    }
}
