//! pydtogen schema - Table descriptors and Pydantic model generation
//!
//! This crate turns relational table metadata into Python source text that
//! declares Pydantic models, one class per table or a Base/Create/Update/Read
//! family of classes per table when split mode is enabled.
//!
//! # Features
//!
//! - **Data-driven type catalog** with vendor dialect overrides
//! - **Constraint synthesis** for bounded strings, bytes and integers
//! - **Field partitioning** across write and read oriented variants
//! - **Grouped imports** split into future, standard library and third party
//! - **YAML table reader** for feeding descriptors from files
//!
//! # Example
//!
//! ```rust
//! use pydtogen_schema::{ColumnDescriptor, Generator, GeneratorOptions, TableDescriptor};
//!
//! # fn example() -> pydtogen_schema::Result<()> {
//! let table = TableDescriptor::new("user_account")
//!     .with_column(ColumnDescriptor::new("id", "INTEGER").primary_key())
//!     .with_column(ColumnDescriptor::new("email", "VARCHAR").with_length(255));
//!
//! let generator = Generator::new(GeneratorOptions::default())?;
//! let source = generator.generate(&[table])?;
//! assert!(source.contains("class UserAccount(BaseModel):"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use thiserror::Error;

pub mod catalog;
pub mod codegen;
pub mod constraints;
pub mod generator;
pub mod imports;
pub mod options;
pub mod parser;
pub mod partition;
pub mod types;
pub mod validator;

pub use catalog::{PythonType, TypeCatalog, TypeMapping};
pub use generator::Generator;
pub use imports::ImportRegistry;
pub use options::{BaseModelRef, ExclusionOverlap, GeneratorOptions, LengthConstraintPriority};
pub use parser::TableReader;
#[cfg(feature = "yaml")]
pub use parser::YamlTableReader;
pub use partition::{ExclusionKind, ExclusionSets, FieldPartitioner};
pub use types::*;
pub use validator::SchemaValidator;

/// Generation errors
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unsupported column type '{type_name}' for column '{table}.{column}' (dialect: {dialect})")]
    UnsupportedColumnType {
        table: String,
        column: String,
        type_name: String,
        dialect: Dialect,
    },

    #[error("Field '{table}.{field}' is listed in more than one exclusion set ({sets})")]
    AmbiguousFieldClassification {
        table: String,
        field: String,
        sets: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Code generation error: {0}")]
    CodeGen(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Validation result containing all errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a new empty validation result
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a validation error
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Add a validation warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to a single error if there are validation errors
    pub fn into_result(self) -> Result<()> {
        if self.has_errors() {
            Err(GenerateError::Validation(format!(
                "Table validation failed with {} error(s):\n{}",
                self.errors.len(),
                self.errors.join("\n")
            )))
        } else {
            Ok(())
        }
    }
}

/// Generate a Python module for `tables` with a one-off [`Generator`].
pub fn generate(tables: &[TableDescriptor], options: GeneratorOptions) -> Result<String> {
    Generator::new(options)?.generate(tables)
}
