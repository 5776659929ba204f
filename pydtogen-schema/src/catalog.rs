//! Native column type catalog
//!
//! A static lookup from `(dialect, native type name)` to the Python type a
//! column is declared with. Dialect entries shadow generic entries of the same
//! name, since vendor types may carry extra metadata such as integer bit width
//! or an implied maximum length.

use crate::imports::ImportRef;
use crate::types::Dialect;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Python-level type a native column maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PythonType {
    Int,
    Str,
    Bool,
    Bytes,
    Float,
    Decimal,
    Date,
    DateTime,
    Time,
    TimeDelta,
    Uuid,
    Dict,
    List,
}

impl PythonType {
    /// Name used in annotations
    pub fn name(&self) -> &'static str {
        match self {
            PythonType::Int => "int",
            PythonType::Str => "str",
            PythonType::Bool => "bool",
            PythonType::Bytes => "bytes",
            PythonType::Float => "float",
            PythonType::Decimal => "Decimal",
            PythonType::Date => "date",
            PythonType::DateTime => "datetime",
            PythonType::Time => "time",
            PythonType::TimeDelta => "timedelta",
            PythonType::Uuid => "UUID",
            PythonType::Dict => "dict",
            PythonType::List => "list",
        }
    }

    /// Import needed to reference the type; builtins need none
    pub fn import(&self) -> Option<ImportRef> {
        match self {
            PythonType::Decimal => Some(ImportRef::new("decimal", "Decimal")),
            PythonType::Date => Some(ImportRef::new("datetime", "date")),
            PythonType::DateTime => Some(ImportRef::new("datetime", "datetime")),
            PythonType::Time => Some(ImportRef::new("datetime", "time")),
            PythonType::TimeDelta => Some(ImportRef::new("datetime", "timedelta")),
            PythonType::Uuid => Some(ImportRef::new("uuid", "UUID")),
            _ => None,
        }
    }

    /// Pydantic strict counterpart, for the primitives that have one
    pub fn strict(&self) -> Option<ImportRef> {
        match self {
            PythonType::Int => Some(ImportRef::new("pydantic", "StrictInt")),
            PythonType::Str => Some(ImportRef::new("pydantic", "StrictStr")),
            PythonType::Bool => Some(ImportRef::new("pydantic", "StrictBool")),
            PythonType::Bytes => Some(ImportRef::new("pydantic", "StrictBytes")),
            PythonType::Float => Some(ImportRef::new("pydantic", "StrictFloat")),
            _ => None,
        }
    }
}

/// Catalog entry for one native type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub python: PythonType,

    /// Maximum length implied by the type itself (MySQL TINYTEXT)
    pub implied_length: Option<u32>,

    /// Storage width of integer types
    pub bit_width: Option<u8>,
}

impl TypeMapping {
    pub const fn new(python: PythonType) -> Self {
        Self {
            python,
            implied_length: None,
            bit_width: None,
        }
    }

    pub const fn with_length(mut self, length: u32) -> Self {
        self.implied_length = Some(length);
        self
    }

    pub const fn with_bits(mut self, bits: u8) -> Self {
        self.bit_width = Some(bits);
        self
    }
}

/// Which catalog answered a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Generic,
    Dialect(Dialect),
}

/// Result of resolving a native type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedType {
    pub mapping: TypeMapping,
    pub source: CatalogSource,
}

use PythonType::*;

const fn t(python: PythonType) -> TypeMapping {
    TypeMapping::new(python)
}

const GENERIC_TYPES: &[(&str, TypeMapping)] = &[
    ("INTEGER", t(Int)),
    ("INT", t(Int)),
    ("BIGINT", t(Int)),
    ("BIGINTEGER", t(Int)),
    ("SMALLINT", t(Int)),
    ("SMALLINTEGER", t(Int)),
    ("STRING", t(Str)),
    ("VARCHAR", t(Str)),
    ("CHAR", t(Str)),
    ("NVARCHAR", t(Str)),
    ("NCHAR", t(Str)),
    ("TEXT", t(Str)),
    ("CLOB", t(Str)),
    ("UNICODE", t(Str)),
    ("UNICODETEXT", t(Str)),
    ("ENUM", t(Str)),
    ("BOOLEAN", t(Bool)),
    ("BOOL", t(Bool)),
    ("BIT", t(Bool)),
    ("FLOAT", t(Float)),
    ("REAL", t(Float)),
    ("DOUBLE", t(Float)),
    ("DOUBLE_PRECISION", t(Float)),
    ("NUMERIC", t(Decimal)),
    ("DECIMAL", t(Decimal)),
    ("DATE", t(Date)),
    ("DATETIME", t(DateTime)),
    ("TIMESTAMP", t(DateTime)),
    ("TIME", t(Time)),
    ("INTERVAL", t(TimeDelta)),
    ("BLOB", t(Bytes)),
    ("BINARY", t(Bytes)),
    ("VARBINARY", t(Bytes)),
    ("LARGEBINARY", t(Bytes)),
    ("JSON", t(Dict)),
    ("UUID", t(Uuid)),
    ("ARRAY", t(List)),
];

const MYSQL_TYPES: &[(&str, TypeMapping)] = &[
    ("TINYINT", t(Int).with_bits(8)),
    ("SMALLINT", t(Int).with_bits(16)),
    ("MEDIUMINT", t(Int).with_bits(24)),
    ("INTEGER", t(Int).with_bits(32)),
    ("INT", t(Int).with_bits(32)),
    ("BIGINT", t(Int).with_bits(64)),
    ("YEAR", t(Int)),
    ("BIT", t(Int)),
    ("TINYTEXT", t(Str).with_length(255)),
    ("MEDIUMTEXT", t(Str)),
    ("LONGTEXT", t(Str)),
    ("SET", t(Str)),
    ("TINYBLOB", t(Bytes).with_length(255)),
    ("MEDIUMBLOB", t(Bytes)),
    ("LONGBLOB", t(Bytes)),
    ("DOUBLE", t(Float)),
    ("JSON", t(Dict)),
];

const POSTGRES_TYPES: &[(&str, TypeMapping)] = &[
    ("SMALLINT", t(Int).with_bits(16)),
    ("INTEGER", t(Int).with_bits(32)),
    ("BIGINT", t(Int).with_bits(64)),
    ("UUID", t(Uuid)),
    ("JSON", t(Dict)),
    ("JSONB", t(Dict)),
    ("BYTEA", t(Bytes)),
    ("INET", t(Str)),
    ("CIDR", t(Str)),
    ("MACADDR", t(Str)),
    ("TSVECTOR", t(Str)),
    ("BIT", t(Str)),
    ("MONEY", t(Decimal)),
    ("INTERVAL", t(TimeDelta)),
    ("TIMESTAMPTZ", t(DateTime)),
    ("TIMETZ", t(Time)),
    ("DOUBLE_PRECISION", t(Float)),
    ("ARRAY", t(List)),
];

const SQLITE_TYPES: &[(&str, TypeMapping)] = &[
    ("DATETIME", t(DateTime)),
    ("DATE", t(Date)),
    ("TIME", t(Time)),
    ("JSON", t(Dict)),
];

static BUILTIN_CATALOG: Lazy<TypeCatalog> = Lazy::new(|| {
    let mut catalog = TypeCatalog::empty();
    for (dialect, entries) in [
        (Dialect::Generic, GENERIC_TYPES),
        (Dialect::MySql, MYSQL_TYPES),
        (Dialect::Postgres, POSTGRES_TYPES),
        (Dialect::Sqlite, SQLITE_TYPES),
    ] {
        for (name, mapping) in entries {
            catalog.register(dialect, name, *mapping);
        }
    }
    catalog
});

/// Normalise a native type name for lookup: `double precision` -> `DOUBLE_PRECISION`
fn normalize(type_name: &str) -> String {
    type_name
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_uppercase()
}

/// Native type to Python type lookup table
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    entries: HashMap<(Dialect, String), TypeMapping>,
}

impl TypeCatalog {
    /// A catalog with no entries at all
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace an entry, returning the previous mapping
    pub fn register(
        &mut self,
        dialect: Dialect,
        type_name: &str,
        mapping: TypeMapping,
    ) -> Option<TypeMapping> {
        self.entries.insert((dialect, normalize(type_name)), mapping)
    }

    /// Look up a native type, preferring the dialect's own entry
    pub fn resolve(&self, type_name: &str, dialect: Option<Dialect>) -> Option<ResolvedType> {
        let name = normalize(type_name);

        if let Some(dialect) = dialect.filter(|d| *d != Dialect::Generic) {
            if let Some(mapping) = self.entries.get(&(dialect, name.clone())) {
                return Some(ResolvedType {
                    mapping: *mapping,
                    source: CatalogSource::Dialect(dialect),
                });
            }
        }

        self.entries
            .get(&(Dialect::Generic, name))
            .map(|mapping| ResolvedType {
                mapping: *mapping,
                source: CatalogSource::Generic,
            })
    }

    /// Sorted type names registered for `dialect` (dialect entries only)
    pub fn type_names(&self, dialect: Dialect) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .keys()
            .filter(|(d, _)| *d == dialect)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        BUILTIN_CATALOG.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_lookup_is_case_insensitive() {
        let catalog = TypeCatalog::default();
        let resolved = catalog.resolve("varchar", None).unwrap();
        assert_eq!(resolved.mapping.python, PythonType::Str);
        assert_eq!(resolved.source, CatalogSource::Generic);

        let resolved = catalog.resolve("double precision", None).unwrap();
        assert_eq!(resolved.mapping.python, PythonType::Float);
    }

    #[test]
    fn test_dialect_entry_wins_over_generic() {
        let catalog = TypeCatalog::default();

        let generic = catalog.resolve("BIT", None).unwrap();
        assert_eq!(generic.mapping.python, PythonType::Bool);

        let postgres = catalog.resolve("BIT", Some(Dialect::Postgres)).unwrap();
        assert_eq!(postgres.mapping.python, PythonType::Str);
        assert_eq!(postgres.source, CatalogSource::Dialect(Dialect::Postgres));

        let mysql = catalog.resolve("SMALLINT", Some(Dialect::MySql)).unwrap();
        assert_eq!(mysql.mapping.bit_width, Some(16));
        assert_eq!(catalog.resolve("SMALLINT", None).unwrap().mapping.bit_width, None);
    }

    #[test]
    fn test_dialect_falls_back_to_generic() {
        let catalog = TypeCatalog::default();
        let resolved = catalog.resolve("VARCHAR", Some(Dialect::MySql)).unwrap();
        assert_eq!(resolved.source, CatalogSource::Generic);
    }

    #[test]
    fn test_vendor_only_types() {
        let catalog = TypeCatalog::default();
        assert!(catalog.resolve("TINYTEXT", None).is_none());

        let tinytext = catalog.resolve("TINYTEXT", Some(Dialect::MySql)).unwrap();
        assert_eq!(tinytext.mapping.implied_length, Some(255));
        assert!(catalog.resolve("JSONB", Some(Dialect::MySql)).is_none());
    }

    #[test]
    fn test_register_extends_catalog() {
        let mut catalog = TypeCatalog::default();
        assert!(catalog.resolve("GEOMETRY", Some(Dialect::MySql)).is_none());

        catalog.register(Dialect::MySql, "geometry", TypeMapping::new(PythonType::Bytes));
        let resolved = catalog.resolve("GEOMETRY", Some(Dialect::MySql)).unwrap();
        assert_eq!(resolved.mapping.python, PythonType::Bytes);
        assert!(catalog.type_names(Dialect::MySql).contains(&"GEOMETRY"));
    }

    #[test]
    fn test_strict_counterparts() {
        assert_eq!(PythonType::Str.strict().unwrap().symbol, "StrictStr");
        assert_eq!(PythonType::Bytes.strict().unwrap().symbol, "StrictBytes");
        assert!(PythonType::DateTime.strict().is_none());
        assert_eq!(PythonType::DateTime.import().unwrap().package, "datetime");
        assert!(PythonType::Int.import().is_none());
    }
}
