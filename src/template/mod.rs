//! HTML template module.
//!
//! A deliberately small Handlebars-style engine for the reply email:
//!
//! - Variable expansion: `{{name}}`, HTML-escaped on output
//! - Escaping: `\{{` outputs a literal `{{`
//!
//! Rendering is strict: a variable missing from the context is an error, so
//! the caller can fall back to a plain-text email.
//!
//! # Example
//!
//! ```
//! use contact_relay::template::{HtmlTemplate, TemplateContext};
//!
//! let template = HtmlTemplate::parse("greeting", "<p>Hello, {{name}}!</p>").unwrap();
//! let context = TemplateContext::new().with("name", "Jo & Co");
//!
//! let result = template.render(&context).unwrap();
//! assert_eq!(result, "<p>Hello, Jo &amp; Co!</p>");
//! ```

mod parser;
mod renderer;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

pub use parser::{Node, Parser};
pub use renderer::{escape_html, Renderer};

/// Template-related errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template file could not be read.
    #[error("Read error: {0}")]
    Read(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Variable not found.
    #[error("Variable not found: {0}")]
    VariableNotFound(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`TemplateContext::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A parsed HTML template.
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    name: String,
    nodes: Vec<Node>,
}

impl HtmlTemplate {
    /// Parse a template from source text.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let nodes = Parser::new(source)
            .parse()
            .map_err(|e| TemplateError::Parse(format!("{name}: {e}")))?;
        Ok(Self { name, nodes })
    }

    /// Load and parse a template file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TemplateError::NotFound(path.display().to_string()));
        }

        let source = fs::read_to_string(path)
            .map_err(|e| TemplateError::Read(format!("{}: {e}", path.display())))?;
        Self::parse(path.display().to_string(), &source)
    }

    /// Template name (the file path for loaded templates).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        Renderer::new(context).render(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_context_set_and_get() {
        let mut context = TemplateContext::new();
        context.set("name", "Jo");

        assert_eq!(context.get("name"), Some("Jo"));
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn test_parse_and_render() {
        let template = HtmlTemplate::parse("t", "Hi {{ name }}, bye {{name}}.").unwrap();
        let context = TemplateContext::new().with("name", "Jo");

        assert_eq!(template.render(&context).unwrap(), "Hi Jo, bye Jo.");
        assert_eq!(template.name(), "t");
    }

    #[test]
    fn test_parse_error_names_template() {
        let err = HtmlTemplate::parse("reply", "{{name").unwrap_err();
        match err {
            TemplateError::Parse(msg) => assert!(msg.starts_with("reply:")),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_missing_variable() {
        let template = HtmlTemplate::parse("t", "{{name}}").unwrap();
        let err = template.render(&TemplateContext::new()).unwrap_err();

        assert!(matches!(err, TemplateError::VariableNotFound(ref v) if v == "name"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1>Thanks {{{{name}}}}</h1>").unwrap();

        let template = HtmlTemplate::load(file.path()).unwrap();
        let context = TemplateContext::new().with("name", "Jo");
        assert_eq!(template.render(&context).unwrap(), "<h1>Thanks Jo</h1>");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HtmlTemplate::load(dir.path().join("absent.html")).unwrap_err();

        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_bundled_reply_template() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/thank_you_email.html");
        let template = HtmlTemplate::load(path).unwrap();
        let html = template
            .render(
                &TemplateContext::new()
                    .with("name", "Jo")
                    .with("operator", "Jane Doe"),
            )
            .unwrap();

        assert!(html.contains("Hi Jo,"));
        assert!(html.contains("Sincerely,<br>Jane Doe"));
        assert!(!html.contains("{{"));
    }
}
