//! Code generation module
//!
//! Template handling for Python model rendering plus the naming helpers the
//! generator needs: class name casing and Python keyword escaping.

use crate::{GenerateError, Result};
use handlebars::Handlebars;
use serde::Serialize;

pub mod pydantic;
pub mod templates;

pub use pydantic::ClassRenderer;

/// Template-based code generator
pub struct TemplateGenerator {
    handlebars: Handlebars<'static>,
}

impl TemplateGenerator {
    /// Create a new template generator emitting raw source text
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Generated code is not HTML: quotes in `Field(alias="...")` stay as-is
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        Self { handlebars }
    }

    /// Register a template
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| GenerateError::CodeGen(format!("Template registration failed: {}", e)))?;
        Ok(())
    }

    /// Render a template with context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| GenerateError::CodeGen(format!("Template rendering failed: {}", e)))
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Whether `name` can be used as a Python identifier (keywords included)
pub fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Attribute name for a column key: keywords get a trailing underscore
pub fn python_field_name(key: &str) -> String {
    if is_python_keyword(key) {
        format!("{}_", key)
    } else {
        key.to_string()
    }
}

// String transformation utilities

pub fn to_camel_case(input: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for ch in input.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

pub fn to_pascal_case(input: &str) -> String {
    let camel = to_camel_case(input);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => camel,
    }
}
