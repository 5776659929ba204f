//! Pydantic class renderer
//!
//! Turns a [`ClassDeclaration`] into Python source: the class header and one
//! indented declaration per field, or a single `pass` for an empty body.
//! Rendering is pure; imports are registered before a class reaches here.

use crate::codegen::templates::PYDANTIC_CLASS_TEMPLATE;
use crate::codegen::TemplateGenerator;
use crate::{ClassDeclaration, GenerateError, Result};
use serde::Serialize;

const CLASS_TEMPLATE_NAME: &str = "pydantic_class";

/// Statement used as the body of a class without fields
const EMPTY_BODY: &str = "pass";

#[derive(Debug, Serialize)]
struct ClassContext<'a> {
    name: &'a str,
    parent: &'a str,
    lines: Vec<String>,
}

/// Renders one class declaration to text
pub struct ClassRenderer {
    template_generator: TemplateGenerator,
    indentation: String,
}

impl ClassRenderer {
    /// `indentation` must be non-empty and made of spaces or tabs only
    pub fn new(indentation: impl Into<String>) -> Result<Self> {
        let indentation = indentation.into();
        if indentation.is_empty() || !indentation.chars().all(|c| c == ' ' || c == '\t') {
            return Err(GenerateError::CodeGen(format!(
                "Invalid indentation {:?}: expected one or more spaces or tabs",
                indentation
            )));
        }

        let mut template_generator = TemplateGenerator::new();
        template_generator.register_template(CLASS_TEMPLATE_NAME, PYDANTIC_CLASS_TEMPLATE)?;

        Ok(Self {
            template_generator,
            indentation,
        })
    }

    pub fn render(&self, class: &ClassDeclaration) -> Result<String> {
        let mut lines: Vec<String> = class
            .fields
            .iter()
            .map(|field| format!("{}{}", self.indentation, field))
            .collect();
        if lines.is_empty() {
            lines.push(format!("{}{}", self.indentation, EMPTY_BODY));
        }

        let context = ClassContext {
            name: &class.name,
            parent: &class.parent,
            lines,
        };
        self.template_generator.render(CLASS_TEMPLATE_NAME, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldDeclaration;

    fn field(name: &str, annotation: &str, default: Option<&str>) -> FieldDeclaration {
        FieldDeclaration {
            name: name.to_string(),
            annotation: annotation.to_string(),
            default: default.map(str::to_string),
        }
    }

    #[test]
    fn test_render_class_with_fields() {
        let renderer = ClassRenderer::new("    ").unwrap();
        let class = ClassDeclaration {
            name: "MPEvent".to_string(),
            parent: "BaseModel".to_string(),
            fields: vec![
                field("uuid", "constr(max_length=36)", None),
                field("source_id", "Optional[int]", Some("None")),
            ],
        };

        assert_eq!(
            renderer.render(&class).unwrap(),
            "class MPEvent(BaseModel):\n    uuid: constr(max_length=36)\n    source_id: Optional[int] = None"
        );
    }

    #[test]
    fn test_render_empty_class_uses_pass() {
        let renderer = ClassRenderer::new("\t").unwrap();
        let class = ClassDeclaration {
            name: "MPEventCreate".to_string(),
            parent: "MPEventBase".to_string(),
            fields: vec![],
        };

        assert_eq!(
            renderer.render(&class).unwrap(),
            "class MPEventCreate(MPEventBase):\n\tpass"
        );
    }

    #[test]
    fn test_indentation_must_be_whitespace() {
        for indentation in ["", "--", " x"] {
            assert!(matches!(
                ClassRenderer::new(indentation),
                Err(GenerateError::CodeGen(_))
            ));
        }
        assert!(ClassRenderer::new(" \t").is_ok());
    }

    #[test]
    fn test_render_keeps_alias_quotes() {
        let renderer = ClassRenderer::new("  ").unwrap();
        let class = ClassDeclaration {
            name: "Lesson".to_string(),
            parent: "BaseModel".to_string(),
            fields: vec![field("class_", "str", Some("Field(alias=\"class\")"))],
        };

        assert_eq!(
            renderer.render(&class).unwrap(),
            "class Lesson(BaseModel):\n  class_: str = Field(alias=\"class\")"
        );
    }
}
