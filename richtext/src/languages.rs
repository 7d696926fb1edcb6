//! Syntax-highlighting language registry for code blocks.
//!
//! The editor lets the author pick a display language per code block; the
//! value is only ever used as a `language-*` CSS class for client-side
//! highlighting. Unrecognized names fall back to `plaintext` rather than
//! erroring, since the choice carries no semantics.

use std::collections::HashMap;

/// Known language names plus their aliases, resolving to a canonical name.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    canonical: HashMap<&'static str, &'static str>,
}

/// (alias, canonical) pairs. Canonical names map to themselves.
const LANGUAGES: &[(&str, &str)] = &[
    ("plaintext", "plaintext"),
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("python", "python"),
    ("py", "python"),
    ("java", "java"),
    ("sql", "sql"),
    ("xml", "xml"),
    ("c", "c"),
    ("c++", "cpp"),
    ("cpp", "cpp"),
];

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            canonical: LANGUAGES.iter().copied().collect(),
        }
    }

    /// Resolve a user-supplied language name to its canonical form.
    /// Matching is case-insensitive; unknown names resolve to `plaintext`.
    pub fn resolve(&self, name: &str) -> &'static str {
        let name = name.trim().to_ascii_lowercase();
        self.canonical
            .get(name.as_str())
            .copied()
            .unwrap_or("plaintext")
    }

    /// Whether a name (or alias) is a known language.
    pub fn is_known(&self, name: &str) -> bool {
        self.canonical
            .contains_key(name.trim().to_ascii_lowercase().as_str())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let langs = LanguageRegistry::new();
        assert_eq!(langs.resolve("js"), "javascript");
        assert_eq!(langs.resolve("TS"), "typescript");
        assert_eq!(langs.resolve("C++"), "cpp");
    }

    #[test]
    fn test_resolve_canonical_is_identity() {
        let langs = LanguageRegistry::new();
        assert_eq!(langs.resolve("python"), "python");
        assert_eq!(langs.resolve("SQL"), "sql");
    }

    #[test]
    fn test_unknown_falls_back_to_plaintext() {
        let langs = LanguageRegistry::new();
        assert_eq!(langs.resolve("brainfuck"), "plaintext");
        assert_eq!(langs.resolve(""), "plaintext");
        assert!(!langs.is_known("brainfuck"));
    }
}
