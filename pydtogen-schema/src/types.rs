//! Table descriptors and resolved model types

use crate::codegen::to_pascal_case;
use crate::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Database vendor owning a native column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "generic")]
    Generic,
    #[serde(rename = "mysql", alias = "mariadb")]
    MySql,
    #[serde(rename = "postgres", alias = "postgresql")]
    Postgres,
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(GenerateError::Parse(format!("Unknown dialect: {}", other))),
        }
    }
}

/// Native column metadata handed over by a table reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct ColumnDescriptor {
    /// Column key (auto-assigned from YAML key if not specified)
    pub name: String,

    /// Native type identifier (VARCHAR, TINYINT, JSONB, ...)
    #[serde(rename = "type")]
    pub type_name: String,

    /// Declared maximum length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    pub nullable: bool,

    pub primary_key: bool,

    /// Integer signedness, only meaningful for vendor integer types
    pub unsigned: bool,

    /// Vendor owning the type; inherits the table dialect when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
}

/// Column as written by hand: `type` may carry a length, `nullable` is optional
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawColumn {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    length: Option<u32>,
    nullable: Option<bool>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unsigned: bool,
    dialect: Option<Dialect>,
}

impl TryFrom<RawColumn> for ColumnDescriptor {
    type Error = GenerateError;

    fn try_from(raw: RawColumn) -> Result<Self> {
        let (type_name, parsed_length) = parse_native_type(&raw.type_name)?;
        Ok(Self {
            name: raw.name,
            type_name,
            length: raw.length.or(parsed_length),
            // ORM default: primary keys are NOT NULL, everything else nullable
            nullable: raw.nullable.unwrap_or(!raw.primary_key),
            primary_key: raw.primary_key,
            unsigned: raw.unsigned,
            dialect: raw.dialect,
        })
    }
}

impl ColumnDescriptor {
    /// Create a nullable column; `type_name` may carry a length like `VARCHAR(36)`.
    pub fn new(name: impl Into<String>, type_name: &str) -> Self {
        let (type_name, length) = match parse_native_type(type_name) {
            Ok(parsed) => parsed,
            Err(_) => (type_name.trim().to_string(), None),
        };
        Self {
            name: name.into(),
            type_name,
            length,
            nullable: true,
            primary_key: false,
            unsigned: false,
            dialect: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key, which also makes the column NOT NULL
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Dialect used for type resolution: the column's own, else the table's
    pub fn effective_dialect(&self, table: &TableDescriptor) -> Option<Dialect> {
        self.dialect.or(table.dialect)
    }
}

/// Split a native type like `VARCHAR(64)` into its name and length.
///
/// Multi-parameter types (`DECIMAL(10,2)`) and quoted value lists
/// (`ENUM('a','b')`) keep their name and carry no length.
pub fn parse_native_type(type_str: &str) -> Result<(String, Option<u32>)> {
    let type_str = type_str.trim();
    let Some(paren_pos) = type_str.find('(') else {
        return Ok((type_str.to_string(), None));
    };

    if !type_str.ends_with(')') {
        return Err(GenerateError::Parse(format!(
            "Unbalanced parentheses in type '{}'",
            type_str
        )));
    }

    let base_type = type_str[..paren_pos].trim().to_string();
    let params_str = type_str[paren_pos + 1..type_str.len() - 1].trim();
    let params: Vec<&str> = params_str.split(',').map(str::trim).collect();

    if base_type.is_empty() {
        return Err(GenerateError::Parse(format!("Missing type name in '{}'", type_str)));
    }

    match params.as_slice() {
        [single] if single.starts_with('\'') || single.starts_with('"') => Ok((base_type, None)),
        [single] => {
            let length = single.parse::<u32>().map_err(|_| {
                GenerateError::Parse(format!("Invalid length '{}' in type '{}'", single, type_str))
            })?;
            Ok((base_type, Some(length)))
        }
        _ => Ok((base_type, None)),
    }
}

/// Table metadata handed over by a table reader
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Database table name
    pub name: String,

    /// Generated class name, derived from the table name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,

    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,

    /// Fields that only appear in the Create variant
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub create_only_fields: BTreeSet<String>,

    /// Fields that only appear in the Read variant
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub read_only_fields: BTreeSet<String>,

    /// Per-table override of the global split flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<bool>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_create_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_only_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_read_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_only_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = Some(split);
        self
    }

    /// Name of the generated class (before any variant suffix)
    pub fn model_name(&self) -> String {
        match &self.class_name {
            Some(name) => name.clone(),
            None => to_pascal_case(&self.name),
        }
    }

    /// Whether this table is split into variants under the global flag
    pub fn is_split(&self, split_models: bool) -> bool {
        self.split.unwrap_or(split_models)
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Role of a generated class when a table is split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Base,
    Create,
    Update,
    Read,
}

impl Variant {
    /// Render order within one table
    pub const ALL: [Variant; 4] = [Variant::Base, Variant::Create, Variant::Update, Variant::Read];

    pub fn suffix(&self) -> &'static str {
        match self {
            Variant::Base => "Base",
            Variant::Create => "Create",
            Variant::Update => "Update",
            Variant::Read => "Read",
        }
    }
}

/// One resolved table column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAttribute<'a> {
    pub key: String,

    /// Type expression before optional wrapping (`int`, `constr(max_length=36)`)
    pub semantic_type: String,

    /// Native nullability
    pub optional: bool,

    /// Optionality imposed by the variant (Update)
    pub forced_optional: bool,

    /// Native column this attribute was resolved from
    pub column: &'a ColumnDescriptor,
}

impl<'a> ColumnAttribute<'a> {
    pub fn new(column: &'a ColumnDescriptor, semantic_type: String) -> Self {
        Self {
            key: column.name.clone(),
            semantic_type,
            optional: column.nullable,
            forced_optional: false,
            column,
        }
    }

    /// Copy of this attribute that is always rendered optional
    pub fn forced_optional(&self) -> Self {
        Self {
            forced_optional: true,
            ..self.clone()
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional || self.forced_optional
    }
}

/// One generated class: a direct table mapping or a split variant
#[derive(Debug, Clone, PartialEq)]
pub struct ModelClass<'a> {
    pub name: String,

    /// Source table name
    pub table: String,

    pub columns: Vec<ColumnAttribute<'a>>,

    /// Generated class this one extends, instead of the base model
    pub parent: Option<String>,

    /// `None` for a direct (unsplit) mapping
    pub variant: Option<Variant>,
}

impl<'a> ModelClass<'a> {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            parent: None,
            variant: None,
        }
    }

    pub fn column_keys(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key.as_str()).collect()
    }
}

/// A rendered field line: `name: annotation = default`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub annotation: String,
    pub default: Option<String>,
}

impl fmt::Display for FieldDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.annotation)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// A class ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: String,
    pub parent: String,
    pub fields: Vec<FieldDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_type() {
        assert_eq!(parse_native_type("TEXT").unwrap(), ("TEXT".to_string(), None));
        assert_eq!(
            parse_native_type("VARCHAR(36)").unwrap(),
            ("VARCHAR".to_string(), Some(36))
        );
        assert_eq!(
            parse_native_type("DECIMAL(10, 2)").unwrap(),
            ("DECIMAL".to_string(), None)
        );
        assert_eq!(
            parse_native_type("ENUM('draft')").unwrap(),
            ("ENUM".to_string(), None)
        );
        assert!(parse_native_type("VARCHAR(abc)").is_err());
        assert!(parse_native_type("VARCHAR(36").is_err());
    }

    #[test]
    fn test_model_name_defaults_to_pascal_case() {
        assert_eq!(TableDescriptor::new("mp_event").model_name(), "MpEvent");
        assert_eq!(
            TableDescriptor::new("mp_event")
                .with_class_name("MPEvent")
                .model_name(),
            "MPEvent"
        );
    }

    #[test]
    fn test_column_builder() {
        let column = ColumnDescriptor::new("uuid", "VARCHAR(36)").primary_key();
        assert_eq!(column.type_name, "VARCHAR");
        assert_eq!(column.length, Some(36));
        assert!(!column.nullable);

        let table = TableDescriptor::new("t").with_dialect(Dialect::MySql);
        assert_eq!(column.effective_dialect(&table), Some(Dialect::MySql));
        let column = column.with_dialect(Dialect::Postgres);
        assert_eq!(column.effective_dialect(&table), Some(Dialect::Postgres));
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_forced_optional_keeps_native_nullability() {
        let column = ColumnDescriptor::new("message", "TEXT").not_null();
        let attr = ColumnAttribute::new(&column, "str".to_string());
        assert!(!attr.is_optional());

        let forced = attr.forced_optional();
        assert!(!forced.optional);
        assert!(forced.is_optional());
    }

    #[test]
    fn test_field_declaration_display() {
        let field = FieldDeclaration {
            name: "source_id".to_string(),
            annotation: "Optional[int]".to_string(),
            default: Some("None".to_string()),
        };
        assert_eq!(field.to_string(), "source_id: Optional[int] = None");
    }
}
