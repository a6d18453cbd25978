//! The 8-bit cross-language semantic taxonomy.
//!
//! A code is `[ super_kind(2) | kind(2) | super_type(2) | refinement(2) ]`. The
//! refinement bits are reserved for language-specific use and are always zero
//! in codes returned by this module; predicates mask them out so a refined
//! code still matches its category.
//!
//! Codes are always multiples of 4 (Invariant: `semantic_type mod 4 == 0`).

/// Sentinel returned by [`code`] for a name with no assigned code.
pub const UNKNOWN_CODE: u8 = 255;

pub mod super_kind {
    pub const DATA_STRUCTURE: u8 = 0x00;
    pub const COMPUTATION: u8 = 0x40;
    pub const CONTROL_EFFECTS: u8 = 0x80;
    pub const META_EXTERNAL: u8 = 0xC0;
}

pub mod kind {
    use super::super_kind::*;

    pub const LITERAL: u8 = DATA_STRUCTURE | 0x00;
    pub const NAME: u8 = DATA_STRUCTURE | 0x10;
    pub const PATTERN: u8 = DATA_STRUCTURE | 0x20;
    pub const TYPE: u8 = DATA_STRUCTURE | 0x30;

    pub const OPERATOR: u8 = COMPUTATION | 0x00;
    pub const COMPUTATION_NODE: u8 = COMPUTATION | 0x10;
    pub const TRANSFORM: u8 = COMPUTATION | 0x20;
    pub const DEFINITION: u8 = COMPUTATION | 0x30;

    pub const EXECUTION: u8 = CONTROL_EFFECTS | 0x00;
    pub const FLOW_CONTROL: u8 = CONTROL_EFFECTS | 0x10;
    pub const ERROR_HANDLING: u8 = CONTROL_EFFECTS | 0x20;
    pub const ORGANIZATION: u8 = CONTROL_EFFECTS | 0x30;

    pub const METADATA: u8 = META_EXTERNAL | 0x00;
    pub const EXTERNAL: u8 = META_EXTERNAL | 0x10;
    pub const PARSER_SPECIFIC: u8 = META_EXTERNAL | 0x20;
    pub const RESERVED: u8 = META_EXTERNAL | 0x30;
}

/// The 64 leaf categories, `(code, name)` pairs in code order.
///
/// `PARSER_CONSTRUCT` occupies code 0 — the fallback for raw grammar node
/// names absent from a language's node-config table.
const CATEGORIES: &[(u8, &str)] = &[
    (0, "PARSER_CONSTRUCT"),
    (4, "LITERAL_STRING"),
    (8, "LITERAL_NUMBER"),
    (12, "LITERAL_BOOLEAN"),
    (16, "NAME_IDENTIFIER"),
    (20, "NAME_QUALIFIED"),
    (24, "NAME_SCOPED"),
    (28, "NAME_LABEL"),
    (32, "PATTERN_BINDING"),
    (36, "PATTERN_DESTRUCTURE"),
    (40, "PATTERN_WILDCARD"),
    (44, "PATTERN_REST"),
    (48, "TYPE_PRIMITIVE"),
    (52, "TYPE_REFERENCE"),
    (56, "TYPE_GENERIC"),
    (60, "TYPE_FUNCTION"),
    (64, "OPERATOR_ARITHMETIC"),
    (68, "OPERATOR_LOGICAL"),
    (72, "OPERATOR_COMPARISON"),
    (76, "OPERATOR_ASSIGNMENT"),
    (80, "COMPUTATION_CALL"),
    (84, "COMPUTATION_INDEX"),
    (88, "COMPUTATION_MEMBER_ACCESS"),
    (92, "COMPUTATION_CONDITIONAL"),
    (96, "TRANSFORM_CAST"),
    (100, "TRANSFORM_AWAIT"),
    (104, "TRANSFORM_YIELD"),
    (108, "TRANSFORM_SPREAD"),
    (112, "DEFINITION_FUNCTION"),
    (116, "DEFINITION_VARIABLE"),
    (120, "DEFINITION_CLASS"),
    (124, "DEFINITION_MODULE"),
    (128, "EXECUTION_STATEMENT"),
    (132, "EXECUTION_BLOCK"),
    (136, "EXECUTION_EXPRESSION_STATEMENT"),
    (140, "EXECUTION_PROGRAM"),
    (144, "FLOW_CONDITIONAL"),
    (148, "FLOW_LOOP"),
    (152, "FLOW_JUMP"),
    (156, "FLOW_SWITCH"),
    (160, "ERROR_TRY"),
    (164, "ERROR_CATCH"),
    (168, "ERROR_THROW"),
    (172, "ERROR_FINALLY"),
    (176, "ORGANIZATION_IMPORT"),
    (180, "ORGANIZATION_EXPORT"),
    (184, "ORGANIZATION_NAMESPACE"),
    (188, "ORGANIZATION_DECORATOR"),
    (192, "METADATA_COMMENT"),
    (196, "METADATA_DOC_COMMENT"),
    (200, "METADATA_ANNOTATION"),
    (204, "METADATA_ATTRIBUTE"),
    (208, "EXTERNAL_FOREIGN"),
    (212, "EXTERNAL_EMBEDDED"),
    (216, "EXTERNAL_PREPROCESSOR"),
    (220, "EXTERNAL_UNKNOWN"),
    (224, "PARSER_PUNCTUATION"),
    (228, "PARSER_ERROR"),
    (232, "PARSER_MISSING"),
    (236, "PARSER_EXTRA"),
    (240, "RESERVED_0"),
    (244, "RESERVED_1"),
    (248, "RESERVED_2"),
    (252, "RESERVED_3"),
];

/// Canonical name for a taxonomy code. Codes that aren't a multiple of 4 have
/// their low 2 bits masked off first, per the predicate convention.
pub fn name(code: u8) -> &'static str {
    let base = code & 0xFC;
    CATEGORIES
        .iter()
        .find(|&&(c, _)| c == base)
        .map(|&(_, n)| n)
        .unwrap_or("PARSER_CONSTRUCT")
}

/// Reverse lookup. Returns [`UNKNOWN_CODE`] for a name with no assigned code.
pub fn code(name: &str) -> u8 {
    CATEGORIES
        .iter()
        .find(|&&(_, n)| n == name)
        .map(|&(c, _)| c)
        .unwrap_or(UNKNOWN_CODE)
}

pub fn super_kind_of(code: u8) -> u8 {
    code & 0xC0
}

pub fn kind_of(code: u8) -> u8 {
    code & 0xF0
}

pub fn super_kind_name(code: u8) -> &'static str {
    match super_kind_of(code) {
        super_kind::DATA_STRUCTURE => "DATA_STRUCTURE",
        super_kind::COMPUTATION => "COMPUTATION",
        super_kind::CONTROL_EFFECTS => "CONTROL_EFFECTS",
        _ => "META_EXTERNAL",
    }
}

pub fn kind_name(code: u8) -> &'static str {
    match kind_of(code) {
        kind::LITERAL => "LITERAL",
        kind::NAME => "NAME",
        kind::PATTERN => "PATTERN",
        kind::TYPE => "TYPE",
        kind::OPERATOR => "OPERATOR",
        kind::COMPUTATION_NODE => "COMPUTATION_NODE",
        kind::TRANSFORM => "TRANSFORM",
        kind::DEFINITION => "DEFINITION",
        kind::EXECUTION => "EXECUTION",
        kind::FLOW_CONTROL => "FLOW_CONTROL",
        kind::ERROR_HANDLING => "ERROR_HANDLING",
        kind::ORGANIZATION => "ORGANIZATION",
        kind::METADATA => "METADATA",
        kind::EXTERNAL => "EXTERNAL",
        kind::PARSER_SPECIFIC => "PARSER_SPECIFIC",
        _ => "RESERVED",
    }
}

/// Every `(code, name)` pair in the taxonomy, for `semantic_type_codes()`.
pub fn all_categories() -> impl Iterator<Item = (u8, &'static str)> {
    CATEGORIES.iter().copied()
}

pub fn is_definition(code: u8) -> bool {
    kind_of(code) == kind::DEFINITION
}

pub fn is_call(code: u8) -> bool {
    code & 0xFC == 80
}

pub fn is_literal(code: u8) -> bool {
    kind_of(code) == kind::LITERAL
}

pub fn is_control_flow(code: u8) -> bool {
    kind_of(code) == kind::FLOW_CONTROL
}

pub fn is_identifier(code: u8) -> bool {
    kind_of(code) == kind::NAME
}

pub fn is_operator(code: u8) -> bool {
    kind_of(code) == kind::OPERATOR
}

pub fn is_type(code: u8) -> bool {
    kind_of(code) == kind::TYPE
}

pub fn is_external(code: u8) -> bool {
    kind_of(code) == kind::EXTERNAL
}

pub fn is_error_handling(code: u8) -> bool {
    kind_of(code) == kind::ERROR_HANDLING
}

pub fn is_metadata(code: u8) -> bool {
    kind_of(code) == kind::METADATA
}

pub fn is_parser_specific(code: u8) -> bool {
    kind_of(code) == kind::PARSER_SPECIFIC
}

pub fn is_punctuation(code: u8) -> bool {
    code & 0xFC == 224
}

/// Generic kind-band match by kind name, backing `is_kind(code, name)`.
pub fn is_kind(code: u8, kind_name_query: &str) -> bool {
    kind_name(code) == kind_name_query
}

/// Matches `semantic_type_to_string(code) LIKE pattern`-ish taxonomy queries:
/// exact category name, or a kind/super-kind prefix followed by `*`.
pub fn matches_pattern(code: u8, pattern: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        name(code).starts_with(prefix) || kind_name(code).starts_with(prefix) || super_kind_name(code).starts_with(prefix)
    } else {
        name(code) == pattern || kind_name(code) == pattern || super_kind_name(code) == pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_codes_are_multiples_of_four() {
        for &(code, _) in CATEGORIES {
            assert_eq!(code % 4, 0);
        }
    }

    #[test]
    fn round_trip_naming() {
        for &(expected_code, n) in CATEGORIES {
            assert_eq!(code(n), expected_code);
            assert_eq!(name(expected_code), n);
        }
    }

    #[test]
    fn unknown_name_returns_sentinel() {
        assert_eq!(code("NOT_A_REAL_CATEGORY"), UNKNOWN_CODE);
    }

    #[test]
    fn parser_construct_is_code_zero() {
        assert_eq!(code("PARSER_CONSTRUCT"), 0);
        assert_eq!(name(0), "PARSER_CONSTRUCT");
    }

    #[test]
    fn definition_function_predicate() {
        let def_fn = code("DEFINITION_FUNCTION");
        assert!(is_definition(def_fn));
        assert!(!is_definition(code("COMPUTATION_INDEX")));
    }

    #[test]
    fn call_predicate_matches_only_call_category() {
        assert!(is_call(code("COMPUTATION_CALL")));
        assert!(!is_call(code("COMPUTATION_INDEX")));
    }

    #[test]
    fn punctuation_predicate() {
        assert!(is_punctuation(code("PARSER_PUNCTUATION")));
        assert!(!is_punctuation(code("PARSER_ERROR")));
    }

    #[test]
    fn super_kind_and_kind_names() {
        let def_fn = code("DEFINITION_FUNCTION");
        assert_eq!(super_kind_name(def_fn), "COMPUTATION");
        assert_eq!(kind_name(def_fn), "DEFINITION");
    }
}
