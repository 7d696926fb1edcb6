//! # Rich-text document model and sanitization pipeline
//!
//! Question descriptions are authored in a structured editor and arrive at the
//! API as HTML. This crate owns everything between that wire format and what
//! gets persisted:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`node`] | The document tree ([`Document`], [`Node`], [`Mark`]) and its canonical HTML rendering |
//! | [`html`] | A tolerant tokenizer/parser that lifts editor HTML into the document tree |
//! | [`languages`] | The syntax-highlighting registry used to normalize code-block language tags |
//!
//! The sanitization contract is structural: incoming HTML is parsed into the
//! typed tree (unknown tags and attributes simply have nowhere to go) and then
//! re-rendered, so the stored description only ever contains the editor's
//! vocabulary with all text entity-escaped. [`sanitize`] is the one-call entry
//! point used by the question handlers.

pub mod html;
pub mod languages;
pub mod node;

pub use html::parse_html;
pub use languages::LanguageRegistry;
pub use node::{Document, Mark, Node};

/// Parse untrusted editor HTML and re-render it canonically.
///
/// Everything outside the editor's vocabulary is dropped; text content is
/// preserved and escaped. The output is safe to store and to echo back into
/// a page unmodified.
pub fn sanitize(input: &str) -> String {
    parse_html(input).to_html()
}

/// Number of text characters in a document, as counted by the editor's
/// soft 500-character limit. Not enforced server-side.
pub fn char_count(doc: &Document) -> usize {
    doc.char_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_preserves_simple_paragraph() {
        assert_eq!(sanitize("<p>because</p>"), "<p>because</p>");
    }

    #[test]
    fn test_sanitize_strips_script() {
        let out = sanitize("<p>hi</p><script>alert(1)</script>");
        assert_eq!(out, "<p>hi</p>");
    }

    #[test]
    fn test_sanitize_drops_event_handlers() {
        let out = sanitize(r#"<p onclick="steal()">x</p>"#);
        assert_eq!(out, "<p>x</p>");
    }

    #[test]
    fn test_char_count_matches_text_length() {
        let doc = parse_html("<p>ab</p><h2>cde</h2>");
        assert_eq!(char_count(&doc), 5);
    }
}
