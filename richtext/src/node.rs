//! # Document tree and canonical HTML rendering
//!
//! The editor produces a small, fixed vocabulary of block and inline content.
//! [`Node`] models the block structure, [`Mark`] the inline formatting applied
//! to text runs. Both serialize with a `type` tag so the tree can cross the
//! wire as JSON in the editor's own shape.
//!
//! Rendering is the sanitization boundary in the outgoing direction: every
//! text run and attribute value is entity-escaped, link and image targets are
//! checked against an allow-list of schemes, and the code-block language is
//! normalized through [`LanguageRegistry`] before it becomes a CSS class.

use serde::{Deserialize, Serialize};

use crate::languages::LanguageRegistry;

/// Inline formatting applied to a text run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Highlight,
    Code,
    Link { href: String },
}

impl Mark {
    /// The HTML tag this mark renders as.
    fn tag(&self) -> &'static str {
        match self {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Underline => "u",
            Mark::Strike => "s",
            Mark::Highlight => "mark",
            Mark::Code => "code",
            Mark::Link { .. } => "a",
        }
    }
}

/// A block or inline node in the document tree.
///
/// The code-block language is a variant attribute, not a node type of its
/// own; unrecognized languages fall back to plain text at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Paragraph { content: Vec<Node> },
    Heading { level: u8, content: Vec<Node> },
    BulletList { content: Vec<Node> },
    OrderedList { content: Vec<Node> },
    ListItem { content: Vec<Node> },
    CodeBlock { language: String, code: String },
    Image { src: String, alt: String },
    HorizontalRule,
    HardBreak,
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

/// A complete rich-text document: the sequence of top-level blocks.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub content: Vec<Node>,
}

impl Document {
    /// Render the document to canonical, escaped HTML.
    pub fn to_html(&self) -> String {
        let langs = LanguageRegistry::new();
        let mut out = String::new();
        for node in &self.content {
            node.write_html(&mut out, &langs);
        }
        out
    }

    /// Count text characters, mirroring the editor's character counter.
    pub fn char_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    Node::Text { text, .. } => text.chars().count(),
                    Node::CodeBlock { code, .. } => code.chars().count(),
                    Node::Paragraph { content }
                    | Node::Heading { content, .. }
                    | Node::BulletList { content }
                    | Node::OrderedList { content }
                    | Node::ListItem { content } => count(content),
                    _ => 0,
                })
                .sum()
        }
        count(&self.content)
    }
}

impl Node {
    fn write_html(&self, out: &mut String, langs: &LanguageRegistry) {
        match self {
            Node::Paragraph { content } => wrap(out, "p", content, langs),
            Node::Heading { level, content } => {
                // The editor only offers levels 1-3.
                let level = (*level).clamp(1, 3);
                let tag = format!("h{level}");
                out.push('<');
                out.push_str(&tag);
                out.push('>');
                for child in content {
                    child.write_html(out, langs);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
            Node::BulletList { content } => wrap(out, "ul", content, langs),
            Node::OrderedList { content } => wrap(out, "ol", content, langs),
            Node::ListItem { content } => wrap(out, "li", content, langs),
            Node::CodeBlock { language, code } => {
                let lang = langs.resolve(language);
                out.push_str(&format!(
                    "<pre><code class=\"language-{lang}\">{}</code></pre>",
                    html_escape(code)
                ));
            }
            Node::Image { src, alt } => {
                if safe_image_src(src) {
                    out.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\">",
                        html_escape(src),
                        html_escape(alt)
                    ));
                }
            }
            Node::HorizontalRule => out.push_str("<hr>"),
            Node::HardBreak => out.push_str("<br>"),
            Node::Text { text, marks } => {
                // Marks with an unsafe link target are dropped, not rewritten.
                let marks: Vec<&Mark> = marks
                    .iter()
                    .filter(|m| match m {
                        Mark::Link { href } => safe_link_href(href),
                        _ => true,
                    })
                    .collect();
                for mark in &marks {
                    match mark {
                        Mark::Link { href } => {
                            out.push_str(&format!("<a href=\"{}\">", html_escape(href)))
                        }
                        m => {
                            out.push('<');
                            out.push_str(m.tag());
                            out.push('>');
                        }
                    }
                }
                out.push_str(&html_escape(text));
                for mark in marks.iter().rev() {
                    out.push_str("</");
                    out.push_str(mark.tag());
                    out.push('>');
                }
            }
        }
    }
}

fn wrap(out: &mut String, tag: &str, content: &[Node], langs: &LanguageRegistry) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for child in content {
        child.write_html(out, langs);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Links may only point at web or mail targets.
fn safe_link_href(href: &str) -> bool {
    let href = href.trim().to_ascii_lowercase();
    href.starts_with("http://") || href.starts_with("https://") || href.starts_with("mailto:")
}

/// Images may be remote or base64-embedded, nothing else.
fn safe_image_src(src: &str) -> bool {
    let src = src.trim().to_ascii_lowercase();
    src.starts_with("http://")
        || src.starts_with("https://")
        || (src.starts_with("data:image/") && src.contains(";base64,"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text {
            text: s.to_string(),
            marks: vec![],
        }
    }

    #[test]
    fn test_render_paragraph_escapes_text() {
        let doc = Document {
            content: vec![Node::Paragraph {
                content: vec![text("a < b & c")],
            }],
        };
        assert_eq!(doc.to_html(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_render_marks_nest_and_close_in_reverse() {
        let doc = Document {
            content: vec![Node::Paragraph {
                content: vec![Node::Text {
                    text: "hi".to_string(),
                    marks: vec![Mark::Bold, Mark::Italic],
                }],
            }],
        };
        assert_eq!(doc.to_html(), "<p><strong><em>hi</em></strong></p>");
    }

    #[test]
    fn test_render_drops_javascript_link() {
        let doc = Document {
            content: vec![Node::Paragraph {
                content: vec![Node::Text {
                    text: "x".to_string(),
                    marks: vec![Mark::Link {
                        href: "javascript:alert(1)".to_string(),
                    }],
                }],
            }],
        };
        assert_eq!(doc.to_html(), "<p>x</p>");
    }

    #[test]
    fn test_render_code_block_normalizes_language() {
        let doc = Document {
            content: vec![Node::CodeBlock {
                language: "js".to_string(),
                code: "1 < 2".to_string(),
            }],
        };
        assert_eq!(
            doc.to_html(),
            "<pre><code class=\"language-javascript\">1 &lt; 2</code></pre>"
        );
    }

    #[test]
    fn test_render_skips_unsafe_image() {
        let doc = Document {
            content: vec![Node::Image {
                src: "javascript:evil()".to_string(),
                alt: "x".to_string(),
            }],
        };
        assert_eq!(doc.to_html(), "");
    }

    #[test]
    fn test_heading_level_clamped() {
        let doc = Document {
            content: vec![Node::Heading {
                level: 6,
                content: vec![text("t")],
            }],
        };
        assert_eq!(doc.to_html(), "<h3>t</h3>");
    }

    #[test]
    fn test_json_round_trip() {
        let doc = Document {
            content: vec![
                Node::Heading {
                    level: 2,
                    content: vec![text("title")],
                },
                Node::CodeBlock {
                    language: "python".to_string(),
                    code: "print(1)".to_string(),
                },
            ],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
