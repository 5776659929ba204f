//! Template definitions for code generation

/// Pydantic class: header line followed by pre-indented field lines
pub const PYDANTIC_CLASS_TEMPLATE: &str =
    "class {{name}}({{parent}}):{{#each lines}}\n{{this}}{{/each}}";
