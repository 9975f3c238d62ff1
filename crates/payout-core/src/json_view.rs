//! JSON tree rendering
//!
//! Turns any `serde_json::Value` into indented, classified lines. Each line
//! is a list of tokens so the browser can style keys, brackets and the four
//! primitive kinds separately. Joining the tokens back together yields the
//! same text as `serde_json::to_string_pretty`, so the tree view and the raw
//! view always carry the same information.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Key,
    Colon,
    Null,
    Boolean,
    Number,
    String,
    Bracket,
    Comma,
}

impl TokenKind {
    /// CSS class used by the HTML renderer
    pub fn css_class(self) -> &'static str {
        match self {
            TokenKind::Key => "json-key",
            TokenKind::Colon => "json-colon",
            TokenKind::Null => "json-null",
            TokenKind::Boolean => "json-boolean",
            TokenKind::Number => "json-number",
            TokenKind::String => "json-string",
            TokenKind::Bracket => "json-bracket",
            TokenKind::Comma => "json-comma",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLine {
    /// Nesting level; children sit one level deeper than their container
    pub depth: usize,
    pub tokens: Vec<Token>,
}

/// Render `value` into tree lines
pub fn render_tree(value: &Value) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    push_value(value, 0, Vec::new(), false, &mut lines);
    lines
}

fn push_value(
    value: &Value,
    depth: usize,
    mut prefix: Vec<Token>,
    trailing_comma: bool,
    lines: &mut Vec<TreeLine>,
) {
    let comma = |tokens: &mut Vec<Token>| {
        if trailing_comma {
            tokens.push(Token::new(TokenKind::Comma, ","));
        }
    };

    let (open, close, children): (&str, &str, Vec<(Option<&String>, &Value)>) = match value {
        Value::Array(items) => ("[", "]", items.iter().map(|v| (None, v)).collect()),
        Value::Object(map) => ("{", "}", map.iter().map(|(k, v)| (Some(k), v)).collect()),
        leaf => {
            prefix.push(leaf_token(leaf));
            comma(&mut prefix);
            lines.push(TreeLine {
                depth,
                tokens: prefix,
            });
            return;
        }
    };

    if children.is_empty() {
        prefix.push(Token::new(TokenKind::Bracket, format!("{}{}", open, close)));
        comma(&mut prefix);
        lines.push(TreeLine {
            depth,
            tokens: prefix,
        });
        return;
    }

    prefix.push(Token::new(TokenKind::Bracket, open));
    lines.push(TreeLine {
        depth,
        tokens: prefix,
    });

    let last = children.len() - 1;
    for (index, (key, child)) in children.into_iter().enumerate() {
        let child_prefix = match key {
            Some(key) => vec![
                Token::new(TokenKind::Key, quote(key)),
                Token::new(TokenKind::Colon, ": "),
            ],
            None => Vec::new(),
        };
        push_value(child, depth + 1, child_prefix, index < last, lines);
    }

    let mut closing = vec![Token::new(TokenKind::Bracket, close)];
    comma(&mut closing);
    lines.push(TreeLine {
        depth,
        tokens: closing,
    });
}

fn leaf_token(value: &Value) -> Token {
    let kind = match value {
        Value::Null => TokenKind::Null,
        Value::Bool(_) => TokenKind::Boolean,
        Value::Number(_) => TokenKind::Number,
        _ => TokenKind::String,
    };
    Token::new(kind, value.to_string())
}

fn quote(key: &str) -> String {
    Value::String(key.to_string()).to_string()
}

/// Pretty-printed text, two spaces per level
pub fn render_raw(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Flatten tree lines back into text, two spaces per level
pub fn tree_text(lines: &[TreeLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let mut text = "  ".repeat(line.depth);
            for token in &line.tokens {
                text.push_str(&token.text);
            }
            text
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the tree as HTML: one `div.json-line` per line, indented by
/// `indent_px` per level, with one classed `span` per token
pub fn render_tree_html(value: &Value, indent_px: u32) -> String {
    let mut html = String::from(r#"<div class="json-display"><pre class="json-content">"#);
    for line in render_tree(value) {
        html.push_str(&format!(
            r#"<div class="json-line" style="margin-left: {}px">"#,
            line.depth as u64 * u64::from(indent_px)
        ));
        for token in &line.tokens {
            html.push_str(&format!(
                r#"<span class="{}">{}</span>"#,
                token.kind.css_class(),
                escape_html(&token.text)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</pre></div>");
    html
}

/// Render the raw pretty-printed text as HTML
pub fn render_raw_html(value: &Value) -> String {
    format!(
        r#"<div class="json-display"><pre class="json-raw">{}</pre></div>"#,
        escape_html(&render_raw(value))
    )
}
