//! The flat AST node record, its container, and the extraction-config knobs
//! that control how much of it gets populated per parse.

use serde::{Deserialize, Serialize};

pub mod flags {
    pub const IS_KEYWORD: u8 = 0x01;
    pub const IS_PUBLIC: u8 = 0x02;
    pub const IS_UNSAFE: u8 = 0x04;
    pub const IS_KEYWORD_IF_LEAF: u8 = 0x08;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub default_value: Option<String>,
    pub is_optional: bool,
    pub is_variadic: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeContext {
    pub signature_kind: String,
    pub qualified_name: String,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ASTNode {
    pub node_id: u64,
    pub type_raw: String,
    pub type_normalized: String,
    pub name: Option<String>,
    pub file_path: String,
    pub language: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub parent_id: i64,
    pub depth: u32,
    pub sibling_index: u32,
    pub children_count: u32,
    pub descendant_count: u32,
    pub semantic_type: u8,
    pub universal_flags: u8,
    pub arity_bin: u8,
    pub peek: Option<String>,
    pub native: Option<NativeContext>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub file_path: String,
    pub language: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ASTResult {
    pub source: SourceInfo,
    pub nodes: Vec<ASTNode>,
    pub parse_time_ms: f64,
    pub node_count: u32,
    pub max_depth: u32,
}

impl ASTResult {
    /// `node_id`'s direct children, by linear parent scan — the scheduler and
    /// tests use this; the hot parse loop never needs it (it fills
    /// `children_count`/`descendant_count` while traversing instead).
    pub fn children_of(&self, node_id: u64) -> impl Iterator<Item = &ASTNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id == node_id as i64)
    }

    /// Contiguous descendant range `[node_id+1, node_id+descendant_count]`,
    /// exploiting the DFS pre-order invariant.
    pub fn descendant_range(&self, node_id: u64) -> std::ops::RangeInclusive<u64> {
        let node = &self.nodes[node_id as usize];
        (node_id + 1)..=(node_id + node.descendant_count as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SourceLevel {
    None,
    Path,
    LinesOnly,
    #[default]
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StructureLevel {
    None,
    Minimal,
    #[default]
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ContextLevel {
    None,
    NodeTypesOnly,
    #[default]
    Normalized,
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PeekLevel {
    None,
    #[default]
    Smart,
    Custom(u32),
    Full,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractionConfig {
    pub source: SourceLevel,
    pub structure: StructureLevel,
    pub context: ContextLevel,
    pub peek: PeekLevel,
}

impl ExtractionConfig {
    /// Named-parameter surface of `read_ast`/`parse_ast`: `ignore_errors`,
    /// `peek_size`, `peek_mode` resolve into one of these.
    pub fn from_peek_mode(peek_mode: &str, peek_size: i32) -> Self {
        let peek = match peek_mode {
            "none" => PeekLevel::None,
            "full" => PeekLevel::Full,
            "custom" => PeekLevel::Custom(peek_size.max(0) as u32),
            // "auto" and "smart" both resolve to SMART.
            _ => PeekLevel::Smart,
        };
        ExtractionConfig {
            peek,
            ..Default::default()
        }
    }
}

/// UTF-8 sanitize a byte slice, replacing invalid sequences with `?` one byte
/// at a time rather than the lossy replacement-character substitution that
/// `String::from_utf8_lossy` performs, to keep string lengths predictable.
pub fn sanitize_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let mut out = String::with_capacity(bytes.len());
            let mut rest = bytes;
            loop {
                match std::str::from_utf8(rest) {
                    Ok(s) => {
                        out.push_str(s);
                        break;
                    }
                    Err(e) => {
                        let valid_up_to = e.valid_up_to();
                        out.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap());
                        out.push('?');
                        let advance = e.error_len().unwrap_or(1);
                        rest = &rest[valid_up_to + advance..];
                        if rest.is_empty() {
                            break;
                        }
                    }
                }
            }
            out
        }
    }
}

/// Peek rules from the extraction-config peek dimension. `text` is the raw,
/// already UTF-8-sanitized node source slice.
pub fn compute_peek(text: &str, level: PeekLevel) -> String {
    match level {
        PeekLevel::None => String::new(),
        PeekLevel::Full => text.to_string(),
        PeekLevel::Custom(n) => {
            let n = n as usize;
            if text.len() > n {
                truncate_at_char_boundary(text, n).to_string()
            } else {
                text.to_string()
            }
        }
        PeekLevel::Smart => {
            if text.len() <= 50 {
                return text.to_string();
            }
            let first_line = text.split('\n').next().unwrap_or("");
            let single_line = !text.contains('\n');
            let candidate = if single_line { text } else { first_line };
            if candidate.len() > 80 {
                let truncated = truncate_at_char_boundary(candidate, 77);
                format!("{truncated}...")
            } else if single_line {
                candidate.to_string()
            } else {
                candidate.to_string()
            }
        }
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if max_bytes >= s.len() {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Fibonacci bucket index of `children_count`: the count of Fibonacci terms
/// (`1,2,3,5,8,13,...`) that are `<= children_count`. `children_count == 0`
/// yields bucket `0`.
pub fn arity_bin(children_count: u32) -> u8 {
    if children_count == 0 {
        return 0;
    }
    let mut a: u64 = 1;
    let mut b: u64 = 2;
    let mut bucket: u8 = 0;
    let n = children_count as u64;
    while a <= n && bucket < 255 {
        bucket += 1;
        let next = a + b;
        a = b;
        b = next;
    }
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_short_text_is_full() {
        let text = "x".repeat(30);
        assert_eq!(compute_peek(&text, PeekLevel::Smart), text);
    }

    #[test]
    fn peek_long_single_line_truncates_with_ellipsis() {
        let text = "x".repeat(200);
        let peek = compute_peek(&text, PeekLevel::Smart);
        assert!(peek.len() <= 83);
        assert!(peek.ends_with("..."));
    }

    #[test]
    fn peek_custom_no_ellipsis() {
        let text = "x".repeat(200);
        let peek = compute_peek(&text, PeekLevel::Custom(10));
        assert_eq!(peek.len(), 10);
        assert!(!peek.ends_with("..."));
    }

    #[test]
    fn peek_custom_shorter_than_limit_is_unchanged() {
        let text = "short";
        assert_eq!(compute_peek(text, PeekLevel::Custom(120)), text);
    }

    #[test]
    fn peek_none_is_empty() {
        assert_eq!(compute_peek("anything", PeekLevel::None), "");
    }

    #[test]
    fn peek_multiline_uses_first_line() {
        let text = format!("{}\n{}", "a".repeat(100), "b".repeat(100));
        let peek = compute_peek(&text, PeekLevel::Smart);
        assert!(peek.ends_with("..."));
        assert!(peek.len() <= 83);
    }

    #[test]
    fn sanitize_replaces_invalid_bytes() {
        let bytes = vec![b'a', 0xFF, b'b'];
        let sanitized = sanitize_utf8(&bytes);
        assert_eq!(sanitized, "a?b");
    }

    #[test]
    fn arity_bin_zero_for_no_children() {
        assert_eq!(arity_bin(0), 0);
    }

    #[test]
    fn arity_bin_monotonic_nondecreasing() {
        let mut prev = 0u8;
        for n in 0..500u32 {
            let bucket = arity_bin(n);
            assert!(bucket >= prev);
            prev = bucket;
        }
    }

    #[test]
    fn arity_bin_small_counts_get_distinct_buckets() {
        assert!(arity_bin(1) < arity_bin(3));
        assert!(arity_bin(3) < arity_bin(10));
    }
}
