//! Deterministic lowercase file-extension → language-name mapping, used by
//! `read_ast`'s auto-detect mode and `ast_supported_languages()`'s companion
//! `detect_language` scalar.

use std::path::Path;

/// `(language, [extensions])`. Order is insignificant; lookups go through a
/// flattened reverse index built once.
pub const EXTENSION_TABLE: &[(&str, &[&str])] = &[
    ("cpp", &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++"]),
    ("c", &["c", "h"]),
    ("python", &["py", "pyi", "pyw"]),
    ("javascript", &["js", "jsx", "mjs"]),
    ("typescript", &["ts", "tsx"]),
    ("go", &["go"]),
    ("ruby", &["rb", "ruby"]),
    ("sql", &["sql"]),
    ("rust", &["rs", "rlib"]),
    ("markdown", &["md", "markdown"]),
    ("java", &["java"]),
    ("php", &["php", "php3", "php4", "php5", "phtml"]),
    ("html", &["html", "htm"]),
    ("css", &["css"]),
    ("json", &["json"]),
    ("bash", &["sh", "bash", "zsh"]),
    ("swift", &["swift"]),
    ("r", &["r"]),
    ("kotlin", &["kt", "kts"]),
    ("csharp", &["cs"]),
    ("lua", &["lua"]),
    ("hcl", &["hcl", "tf", "tfvars"]),
    ("graphql", &["graphql", "gql"]),
    ("toml", &["toml"]),
];

/// Resolves a file extension (without the leading dot, any case) to a
/// language name, or `"auto"` when the extension isn't recognized.
pub fn extension_for_language(extension: &str) -> &'static str {
    let lower = extension.to_ascii_lowercase();
    for &(language, extensions) in EXTENSION_TABLE {
        if extensions.contains(&lower.as_str()) {
            return language;
        }
    }
    "auto"
}

/// `detect_language(path)` — depends only on the suffix after the last `.`,
/// case-insensitively (Testable Property 9). Returns `"auto"` when the path
/// has no extension or the extension is unrecognized.
pub fn detect_language(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extension_for_language(ext),
        None => "auto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_language_is_case_insensitive() {
        assert_eq!(detect_language(Path::new("main.RS")), "rust");
        assert_eq!(detect_language(Path::new("main.rs")), "rust");
    }

    #[test]
    fn detect_language_depends_only_on_suffix() {
        assert_eq!(detect_language(Path::new("/a/b/c/pkg/main.py")), "python");
        assert_eq!(detect_language(Path::new("main.py")), "python");
    }

    #[test]
    fn unknown_extension_resolves_to_auto() {
        assert_eq!(detect_language(Path::new("data.unknownext")), "auto");
    }

    #[test]
    fn no_extension_resolves_to_auto() {
        assert_eq!(detect_language(Path::new("Makefile")), "auto");
    }

    #[test]
    fn every_listed_language_has_at_least_one_extension() {
        for &(_, extensions) in EXTENSION_TABLE {
            assert!(!extensions.is_empty());
        }
    }
}
