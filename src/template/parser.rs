//! Template parser module.
//!
//! Parses template strings into a flat list of nodes.

use std::fmt;

/// A node in the parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw text content.
    Text(String),

    /// Variable reference: `{{name}}`
    Variable(String),
}

/// Parse failure with the byte offset where it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Template parser.
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the template into a list of nodes.
    pub fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();

        while self.pos < self.input.len() {
            if self.peek_str("\\{{") {
                self.pos += 3;
                push_text(&mut nodes, "{{");
            } else if self.peek_str("{{") {
                nodes.push(self.parse_tag()?);
            } else {
                let text = self.collect_text();
                push_text(&mut nodes, text);
            }
        }

        Ok(nodes)
    }

    /// Parse a single `{{ ... }}` tag.
    fn parse_tag(&mut self) -> Result<Node, ParseError> {
        self.expect("{{")?;
        self.skip_whitespace();

        if matches!(self.peek_char(), Some('#' | '/')) {
            return Err(self.error("block tags are not supported"));
        }

        let name = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        Ok(Node::Variable(name))
    }

    /// Text up to the next tag or escaped brace.
    fn collect_text(&mut self) -> &'a str {
        let rest = &self.input[self.pos..];
        let end = match rest.find("{{") {
            Some(i) if i > 0 && rest.as_bytes()[i - 1] == b'\\' => i - 1,
            Some(i) => i,
            None => rest.len(),
        };
        self.pos += end;
        &rest[..end]
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected variable name"));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn expect(&mut self, s: &str) -> Result<(), ParseError> {
        if self.peek_str(s) {
            self.pos += s.len();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{s}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            offset: self.pos,
        }
    }
}

/// Append text, merging with a preceding text node.
fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}
