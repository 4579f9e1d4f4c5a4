//! Template renderer module.
//!
//! Renders parsed template nodes with the given context.

use super::parser::Node;
use super::{Result, TemplateContext, TemplateError};

/// Template renderer.
pub struct Renderer<'a> {
    context: &'a TemplateContext,
}

impl<'a> Renderer<'a> {
    /// Create a new renderer with the given context.
    pub fn new(context: &'a TemplateContext) -> Self {
        Self { context }
    }

    /// Render a list of nodes to a string.
    pub fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut output = String::new();

        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Variable(name) => output.push_str(&self.render_variable(name)?),
            }
        }

        Ok(output)
    }

    /// Render a variable reference, HTML-escaped.
    fn render_variable(&self, name: &str) -> Result<String> {
        self.context
            .get(name)
            .map(escape_html)
            .ok_or_else(|| TemplateError::VariableNotFound(name.to_string()))
    }
}

/// Escape text for use in HTML element content or quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
