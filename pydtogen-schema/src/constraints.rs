//! Constraint synthesis
//!
//! Builds the final type expression of a column from its resolved catalog
//! entry: bounded `constr`/`conbytes`/`conint` constructors, Pydantic strict
//! types, and the `Optional[...] = None` wrapping of field declarations.
//! Every symbol that ends up in an expression is registered here, and only
//! those.

use crate::catalog::{PythonType, ResolvedType};
use crate::codegen::{is_python_keyword, python_field_name};
use crate::imports::{ImportRef, ImportRegistry, FIELD, OPTIONAL};
use crate::options::{GeneratorOptions, LengthConstraintPriority};
use crate::types::{ColumnAttribute, ColumnDescriptor, FieldDeclaration};

const CONSTR: ImportRef = ImportRef::new("pydantic", "constr");
const CONBYTES: ImportRef = ImportRef::new("pydantic", "conbytes");
const CONINT: ImportRef = ImportRef::new("pydantic", "conint");

/// A value bound derived from column metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `constr` / `conbytes` with `max_length`
    Length { constructor: ImportRef, max_length: u32 },
    /// `conint` with inclusive limits
    Range { ge: i128, le: i128 },
}

impl Bound {
    /// Inclusive integer range of a `bits` wide column
    pub fn integer_range(bits: u8, unsigned: bool) -> Self {
        let bits = u32::from(bits.clamp(1, 64));
        if unsigned {
            Bound::Range {
                ge: 0,
                le: (1i128 << bits) - 1,
            }
        } else {
            Bound::Range {
                ge: -(1i128 << (bits - 1)),
                le: (1i128 << (bits - 1)) - 1,
            }
        }
    }

    pub fn constructor(&self) -> ImportRef {
        match self {
            Bound::Length { constructor, .. } => *constructor,
            Bound::Range { .. } => CONINT,
        }
    }

    pub fn render(&self, strict: bool) -> String {
        let strict = if strict { "strict=True, " } else { "" };
        match self {
            Bound::Length {
                constructor,
                max_length,
            } => format!("{}({}max_length={})", constructor.symbol, strict, max_length),
            Bound::Range { ge, le } => format!("{}({}ge={}, le={})", CONINT.symbol, strict, ge, le),
        }
    }
}

/// Turns resolved columns into type expressions and field declarations
pub struct ConstraintSynthesizer<'o> {
    options: &'o GeneratorOptions,
}

impl<'o> ConstraintSynthesizer<'o> {
    pub fn new(options: &'o GeneratorOptions) -> Self {
        Self { options }
    }

    /// Bound applicable to the column under the current options, if any
    pub fn bound_for(&self, resolved: &ResolvedType, column: &ColumnDescriptor) -> Option<Bound> {
        let mapping = &resolved.mapping;
        match mapping.python {
            PythonType::Str | PythonType::Bytes if self.options.constraint_str_length => {
                let constructor = if mapping.python == PythonType::Str {
                    CONSTR
                } else {
                    CONBYTES
                };
                column
                    .length
                    .or(mapping.implied_length)
                    .map(|max_length| Bound::Length {
                        constructor,
                        max_length,
                    })
            }
            PythonType::Int if self.options.constraint_int_length => mapping
                .bit_width
                .map(|bits| Bound::integer_range(bits, column.unsigned)),
            _ => None,
        }
    }

    /// Type expression for a column, without optional wrapping
    pub fn type_expression(
        &self,
        resolved: &ResolvedType,
        column: &ColumnDescriptor,
        registry: &mut ImportRegistry,
    ) -> String {
        let python = resolved.mapping.python;
        let strict = if self.options.strict_types {
            python.strict()
        } else {
            None
        };
        let bound = self.bound_for(resolved, column);

        match (strict, bound) {
            (None, None) => {
                if let Some(import) = python.import() {
                    registry.register_ref(import);
                }
                python.name().to_string()
            }
            (Some(strict), None) => {
                registry.register_ref(strict);
                strict.symbol.to_string()
            }
            (None, Some(bound)) => {
                registry.register_ref(bound.constructor());
                bound.render(false)
            }
            (Some(strict), Some(bound)) => match self.options.length_constraint_priority {
                LengthConstraintPriority::StrictWins => {
                    log::debug!(
                        "Column '{}' renders as {}; dropping {}",
                        column.name,
                        strict.symbol,
                        bound.render(false)
                    );
                    registry.register_ref(strict);
                    strict.symbol.to_string()
                }
                LengthConstraintPriority::LengthWins => {
                    registry.register_ref(bound.constructor());
                    bound.render(false)
                }
                LengthConstraintPriority::Combine => {
                    registry.register_ref(bound.constructor());
                    bound.render(true)
                }
            },
        }
    }

    /// Field declaration for an attribute, registering `Optional` and `Field`
    /// when they are used.
    pub fn declare(&self, attr: &ColumnAttribute<'_>, registry: &mut ImportRegistry) -> FieldDeclaration {
        let optional = attr.is_optional();
        let annotation = if optional {
            registry.register_ref(OPTIONAL);
            format!("Optional[{}]", attr.semantic_type)
        } else {
            attr.semantic_type.clone()
        };

        let default = if is_python_keyword(&attr.key) {
            registry.register_ref(FIELD);
            if optional {
                Some(format!("Field(default=None, alias=\"{}\")", attr.key))
            } else {
                Some(format!("Field(alias=\"{}\")", attr.key))
            }
        } else if optional {
            Some("None".to_string())
        } else {
            None
        };

        FieldDeclaration {
            name: python_field_name(&attr.key),
            annotation,
            default,
        }
    }
}
