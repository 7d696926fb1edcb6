//! # Tolerant HTML parser for the editor vocabulary
//!
//! Descriptions arrive as the HTML the rich-text editor serialized. This
//! module tokenizes that HTML and parses it into the [`Document`] tree. It is
//! deliberately forgiving: the input is untrusted, so anything that does not
//! fit the vocabulary is either made transparent (unknown wrapper tags keep
//! their text) or dropped wholesale (`script`/`style` and friends lose their
//! content too). Nothing here ever errors; the worst input degrades to an
//! empty document.

use crate::node::{Document, Mark, Node};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close(String),
}

/// Tags whose entire subtree is discarded, text included.
const DROP_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "head", "title", "noscript", "svg",
];

/// Parse editor HTML into a document tree.
pub fn parse_html(input: &str) -> Document {
    let tokens = tokenize(input);
    let mut parser = Parser { tokens, pos: 0 };
    Document {
        content: parser.parse_blocks(None),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Parse block-level content until `until`'s closing tag (or EOF).
    fn parse_blocks(&mut self, until: Option<&str>) -> Vec<Node> {
        let mut nodes = Vec::new();
        while let Some(tok) = self.peek().cloned() {
            match tok {
                Token::Close(name) => {
                    self.advance();
                    if until == Some(name.as_str()) {
                        break;
                    }
                    // Stray close of something we never opened.
                }
                Token::Text(text) if text.trim().is_empty() => self.advance(),
                Token::Open { name, attrs } => match name.as_str() {
                    "p" => {
                        self.advance();
                        nodes.push(Node::Paragraph {
                            content: self.parse_inline(Some("p")),
                        });
                    }
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                        self.advance();
                        let level: u8 = name[1..].parse().unwrap_or(1);
                        nodes.push(Node::Heading {
                            level,
                            content: self.parse_inline(Some(name.as_str())),
                        });
                    }
                    "ul" => {
                        self.advance();
                        nodes.push(Node::BulletList {
                            content: self.parse_list_items("ul"),
                        });
                    }
                    "ol" => {
                        self.advance();
                        nodes.push(Node::OrderedList {
                            content: self.parse_list_items("ol"),
                        });
                    }
                    "li" => {
                        // A list item outside any list: give it one.
                        self.advance();
                        nodes.push(Node::BulletList {
                            content: vec![Node::ListItem {
                                content: self.parse_blocks(Some("li")),
                            }],
                        });
                    }
                    "pre" => {
                        self.advance();
                        nodes.push(self.parse_code_block());
                    }
                    "hr" => {
                        self.advance();
                        nodes.push(Node::HorizontalRule);
                    }
                    "img" => {
                        self.advance();
                        if let Some(node) = image_node(&attrs) {
                            nodes.push(node);
                        }
                    }
                    name if DROP_CONTENT.contains(&name) => {
                        self.advance();
                        self.skip_subtree(name);
                    }
                    _ => {
                        // Text, inline marks, or an unknown wrapper: collect an
                        // implicit paragraph up to the next block boundary.
                        let content = self.parse_inline(None);
                        if !content.is_empty() {
                            nodes.push(Node::Paragraph { content });
                        }
                    }
                },
                Token::Text(_) => {
                    let content = self.parse_inline(None);
                    if !content.is_empty() {
                        nodes.push(Node::Paragraph { content });
                    }
                }
            }
        }
        nodes
    }

    /// Parse inline content. With `stop = Some(tag)` the matching close tag is
    /// consumed; with `stop = None` (implicit paragraph) parsing ends at the
    /// first block boundary, which is left for the caller.
    fn parse_inline(&mut self, stop: Option<&str>) -> Vec<Node> {
        let mut nodes = Vec::new();
        // Open marks, keyed by the tag that opened them so closes pair up.
        let mut marks: Vec<(String, Mark)> = Vec::new();
        while let Some(tok) = self.peek().cloned() {
            match tok {
                Token::Text(text) => {
                    self.advance();
                    nodes.push(Node::Text {
                        text,
                        marks: marks.iter().map(|(_, m)| m.clone()).collect(),
                    });
                }
                Token::Close(name) => {
                    if stop == Some(name.as_str()) {
                        self.advance();
                        break;
                    }
                    if let Some(idx) = marks.iter().rposition(|(tag, _)| *tag == name) {
                        self.advance();
                        marks.remove(idx);
                    } else if is_block_tag(&name) {
                        // Implicitly closes this run; the block loop owns it.
                        break;
                    } else {
                        self.advance();
                    }
                }
                Token::Open { name, attrs } => {
                    if let Some(mark) = mark_for(&name, &attrs) {
                        self.advance();
                        marks.push((name, mark));
                    } else if name == "br" {
                        self.advance();
                        nodes.push(Node::HardBreak);
                    } else if name == "img" {
                        self.advance();
                        if let Some(node) = image_node(&attrs) {
                            nodes.push(node);
                        }
                    } else if DROP_CONTENT.contains(&name.as_str()) {
                        self.advance();
                        self.skip_subtree(&name);
                    } else if is_block_tag(&name) {
                        break;
                    } else {
                        // Unknown inline wrapper (span etc.): transparent.
                        self.advance();
                    }
                }
            }
        }
        nodes
    }

    fn parse_list_items(&mut self, list_tag: &str) -> Vec<Node> {
        let mut items = Vec::new();
        while let Some(tok) = self.peek().cloned() {
            match tok {
                Token::Close(name) => {
                    self.advance();
                    if name == list_tag {
                        break;
                    }
                }
                Token::Open { name, .. } if name == "li" => {
                    self.advance();
                    items.push(Node::ListItem {
                        content: self.parse_blocks(Some("li")),
                    });
                }
                Token::Open { name, .. } if name == "ul" || name == "ol" => {
                    // A list nested directly under a list gets its own item.
                    self.advance();
                    let nested = if name == "ul" {
                        Node::BulletList {
                            content: self.parse_list_items("ul"),
                        }
                    } else {
                        Node::OrderedList {
                            content: self.parse_list_items("ol"),
                        }
                    };
                    items.push(Node::ListItem {
                        content: vec![nested],
                    });
                }
                _ => self.advance(),
            }
        }
        items
    }

    /// Everything up to `</pre>` becomes the literal code body. The language
    /// comes from a `language-*` class on the inner `<code>` tag.
    fn parse_code_block(&mut self) -> Node {
        let mut language = String::from("plaintext");
        let mut code = String::new();
        while let Some(tok) = self.peek().cloned() {
            self.advance();
            match tok {
                Token::Close(name) if name == "pre" => break,
                Token::Text(text) => code.push_str(&text),
                Token::Open { name, attrs } if name == "code" => {
                    if let Some(class) = attr(&attrs, "class") {
                        for part in class.split_whitespace() {
                            if let Some(lang) = part.strip_prefix("language-") {
                                language = lang.to_string();
                            }
                        }
                    }
                }
                Token::Open { name, .. } if name == "br" => code.push('\n'),
                _ => {}
            }
        }
        Node::CodeBlock { language, code }
    }

    /// Discard tokens until the matching close of `name`, honoring nesting.
    fn skip_subtree(&mut self, name: &str) {
        let mut depth = 1usize;
        while let Some(tok) = self.peek().cloned() {
            self.advance();
            match tok {
                Token::Open { name: n, .. } if n == name => depth += 1,
                Token::Close(n) if n == name => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "li" | "pre" | "hr"
    )
}

fn mark_for(name: &str, attrs: &[(String, String)]) -> Option<Mark> {
    match name {
        "strong" | "b" => Some(Mark::Bold),
        "em" | "i" => Some(Mark::Italic),
        "u" => Some(Mark::Underline),
        "s" | "strike" | "del" => Some(Mark::Strike),
        "mark" => Some(Mark::Highlight),
        "code" => Some(Mark::Code),
        "a" => Some(Mark::Link {
            href: attr(attrs, "href").unwrap_or_default(),
        }),
        _ => None,
    }
}

fn image_node(attrs: &[(String, String)]) -> Option<Node> {
    let src = attr(attrs, "src")?;
    if src.trim().is_empty() {
        return None;
    }
    Some(Node::Image {
        src,
        alt: attr(attrs, "alt").unwrap_or_default(),
    })
}

fn attr(attrs: &[(String, String)], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
}

fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if input[i..].starts_with("<!--") {
                i = input[i..]
                    .find("-->")
                    .map(|p| i + p + 3)
                    .unwrap_or(bytes.len());
            } else if matches!(bytes.get(i + 1), Some(&b'!') | Some(&b'?')) {
                // Doctype or processing instruction.
                i = input[i..]
                    .find('>')
                    .map(|p| i + p + 1)
                    .unwrap_or(bytes.len());
            } else if bytes.get(i + 1) == Some(&b'/') {
                let end = input[i..].find('>').map(|p| i + p).unwrap_or(bytes.len());
                let name = input[i + 2..end].trim().to_ascii_lowercase();
                if !name.is_empty() {
                    tokens.push(Token::Close(name));
                }
                i = (end + 1).min(bytes.len());
            } else if bytes
                .get(i + 1)
                .map(|b| b.is_ascii_alphabetic())
                .unwrap_or(false)
            {
                let (token, next) = parse_open_tag(input, i);
                tokens.push(token);
                i = next;
            } else {
                // A lone '<' is plain text.
                tokens.push(Token::Text("<".to_string()));
                i += 1;
            }
        } else {
            let end = input[i..].find('<').map(|p| i + p).unwrap_or(bytes.len());
            let text = decode_entities(&input[i..end]);
            if !text.is_empty() {
                tokens.push(Token::Text(text));
            }
            i = end;
        }
    }
    tokens
}

fn parse_open_tag(input: &str, start: usize) -> (Token, usize) {
    let bytes = input.as_bytes();
    let mut i = start + 1;
    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    let name = input[name_start..i].to_ascii_lowercase();
    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => i += 1,
            _ => {
                let attr_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                let attr_name = input[attr_start..i].to_ascii_lowercase();
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let mut value = String::new();
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if matches!(bytes.get(i), Some(&b'"') | Some(&b'\'')) {
                        let quote = bytes[i];
                        i += 1;
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != quote {
                            i += 1;
                        }
                        value = decode_entities(&input[value_start..i]);
                        if i < bytes.len() {
                            i += 1;
                        }
                    } else {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        value = decode_entities(&input[value_start..i]);
                    }
                }
                if !attr_name.is_empty() {
                    attrs.push((attr_name, value));
                }
            }
        }
    }
    (Token::Open { name, attrs }, i)
}

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let semi = rest[1..].find(';').filter(|&e| e <= 10);
        let decoded = semi.and_then(|end| {
            let entity = &rest[1..end + 1];
            match entity {
                "amp" => Some(('&', end + 2)),
                "lt" => Some(('<', end + 2)),
                "gt" => Some(('>', end + 2)),
                "quot" => Some(('"', end + 2)),
                "apos" => Some(('\'', end + 2)),
                "nbsp" => Some(('\u{a0}', end + 2)),
                e if e.starts_with("#x") || e.starts_with("#X") => {
                    u32::from_str_radix(&e[2..], 16)
                        .ok()
                        .and_then(char::from_u32)
                        .map(|c| (c, end + 2))
                }
                e if e.starts_with('#') => e[1..]
                    .parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .map(|c| (c, end + 2)),
                _ => None,
            }
        });
        match decoded {
            Some((c, skip)) => {
                out.push(c);
                rest = &rest[skip..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paragraph_with_marks() {
        let doc = parse_html("<p>plain <strong>bold <em>both</em></strong></p>");
        assert_eq!(
            doc.content,
            vec![Node::Paragraph {
                content: vec![
                    Node::Text {
                        text: "plain ".to_string(),
                        marks: vec![],
                    },
                    Node::Text {
                        text: "bold ".to_string(),
                        marks: vec![Mark::Bold],
                    },
                    Node::Text {
                        text: "both".to_string(),
                        marks: vec![Mark::Bold, Mark::Italic],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_parse_heading_and_rule() {
        let doc = parse_html("<h2>Title</h2><hr><p>body</p>");
        assert_eq!(doc.content.len(), 3);
        assert!(matches!(doc.content[0], Node::Heading { level: 2, .. }));
        assert!(matches!(doc.content[1], Node::HorizontalRule));
    }

    #[test]
    fn test_parse_code_block_language_class() {
        let doc = parse_html("<pre><code class=\"language-python\">x = 1 &lt; 2</code></pre>");
        assert_eq!(
            doc.content,
            vec![Node::CodeBlock {
                language: "python".to_string(),
                code: "x = 1 < 2".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_lists() {
        let doc = parse_html("<ol><li><p>one</p></li><li><p>two</p></li></ol>");
        let Node::OrderedList { content } = &doc.content[0] else {
            panic!("expected ordered list");
        };
        assert_eq!(content.len(), 2);
        assert!(matches!(content[0], Node::ListItem { .. }));
    }

    #[test]
    fn test_script_content_is_dropped_entirely() {
        let doc = parse_html("<script>document.cookie</script><p>safe</p>");
        assert_eq!(doc.to_html(), "<p>safe</p>");
    }

    #[test]
    fn test_unknown_wrappers_are_transparent() {
        let doc = parse_html("<div><span>kept</span></div>");
        assert_eq!(doc.to_html(), "<p>kept</p>");
    }

    #[test]
    fn test_bare_text_becomes_paragraph() {
        let doc = parse_html("just text");
        assert_eq!(doc.to_html(), "<p>just text</p>");
    }

    #[test]
    fn test_link_href_survives_parse() {
        let doc = parse_html("<p><a href=\"https://example.com\">go</a></p>");
        assert_eq!(
            doc.to_html(),
            "<p><a href=\"https://example.com\">go</a></p>"
        );
    }

    #[test]
    fn test_image_attributes() {
        let doc = parse_html("<img src=\"https://x.io/a.png\" alt=\"pic\">");
        assert_eq!(
            doc.content,
            vec![Node::Image {
                src: "https://x.io/a.png".to_string(),
                alt: "pic".to_string(),
            }]
        );
    }

    #[test]
    fn test_unclosed_tags_do_not_hang() {
        let doc = parse_html("<p><strong>never closed");
        assert_eq!(doc.to_html(), "<p><strong>never closed</strong></p>");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "<h1>t</h1><p><u>a</u> &amp; <s>b</s></p><ul><li><p>i</p></li></ul>";
        let once = crate::sanitize(input);
        let twice = crate::sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(decode_entities("a &amp; b &#65; &#x42; &bogus;"), "a & b A B &bogus;");
    }
}
