//! Table readers
//!
//! The generator consumes [`TableDescriptor`]s from any [`TableReader`]. The
//! YAML reader maps class keys to table bodies:
//!
//! ```yaml
//! MPEvent:
//!   table: mp_event
//!   dialect: mysql
//!   create_only_fields: [topic_name]
//!   columns:
//!     uuid: { type: VARCHAR(36), primary_key: true }
//!     level: { type: TINYINT, unsigned: true, nullable: false }
//! ```

use crate::{Result, TableDescriptor};

#[cfg(feature = "yaml")]
use crate::{ColumnDescriptor, Dialect, GenerateError};
#[cfg(feature = "yaml")]
use indexmap::IndexMap;
#[cfg(feature = "yaml")]
use serde::Deserialize;
#[cfg(feature = "yaml")]
use std::collections::{BTreeSet, HashSet};
#[cfg(feature = "yaml")]
use std::path::{Path, PathBuf};

/// Source of table descriptors
pub trait TableReader {
    fn read_tables(&self) -> Result<Vec<TableDescriptor>>;
}

/// Table body as written in YAML
#[cfg(feature = "yaml")]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    /// Database table name; the map key is used when absent
    table: Option<String>,
    class_name: Option<String>,
    dialect: Option<Dialect>,
    #[serde(default)]
    columns: IndexMap<String, ColumnDescriptor>,
    #[serde(default)]
    create_only_fields: BTreeSet<String>,
    #[serde(default)]
    read_only_fields: BTreeSet<String>,
    split: Option<bool>,
}

#[cfg(feature = "yaml")]
impl TableDocument {
    fn into_descriptor(self, key: String) -> TableDescriptor {
        // With an explicit `table`, the key names the class
        let (name, class_name) = match self.table {
            Some(table) => (table, self.class_name.or(Some(key))),
            None => (key, self.class_name),
        };

        let columns = self
            .columns
            .into_iter()
            .map(|(column_key, mut column)| {
                if column.name.is_empty() {
                    column.name = column_key;
                }
                column
            })
            .collect();

        TableDescriptor {
            name,
            class_name,
            dialect: self.dialect,
            columns,
            create_only_fields: self.create_only_fields,
            read_only_fields: self.read_only_fields,
            split: self.split,
        }
    }
}

/// Reads table descriptors from one YAML document
#[cfg(feature = "yaml")]
pub struct YamlTableReader {
    source: String,
    origin: Option<PathBuf>,
}

#[cfg(feature = "yaml")]
impl YamlTableReader {
    /// Reader over in-memory YAML text
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin: None,
        }
    }

    /// Reader over the contents of a YAML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self {
            source,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Parse the document, keeping table and column order
    pub fn parse(&self) -> Result<Vec<TableDescriptor>> {
        if self.source.trim().is_empty() {
            return Ok(Vec::new());
        }

        let documents: IndexMap<String, TableDocument> =
            serde_yaml::from_str(&self.source).map_err(|e| match &self.origin {
                Some(path) => GenerateError::Parse(format!(
                    "Failed to parse YAML file '{}': {}",
                    path.display(),
                    e
                )),
                None => GenerateError::Yaml(e),
            })?;

        let tables: Vec<TableDescriptor> = documents
            .into_iter()
            .map(|(key, document)| document.into_descriptor(key))
            .collect();
        log::debug!(
            "Read {} table(s) from {}",
            tables.len(),
            self.origin
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string())
        );
        Ok(tables)
    }
}

#[cfg(feature = "yaml")]
impl TableReader for YamlTableReader {
    fn read_tables(&self) -> Result<Vec<TableDescriptor>> {
        self.parse()
    }
}

/// YAML files of a directory in name order, skipping `_`-prefixed files
#[cfg(feature = "yaml")]
pub fn yaml_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                && path
                    .file_name()
                    .is_some_and(|name| !name.to_string_lossy().starts_with('_'))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read tables from files and directories, in argument order.
///
/// A table name defined twice across the inputs is an error.
#[cfg(feature = "yaml")]
pub fn read_tables_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<TableDescriptor>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            files.extend(yaml_files_in(path)?);
        } else {
            files.push(path.to_path_buf());
        }
    }

    let mut seen = HashSet::new();
    let mut tables = Vec::new();
    for file in files {
        for table in YamlTableReader::from_path(&file)?.read_tables()? {
            if !seen.insert(table.name.clone()) {
                return Err(GenerateError::Parse(format!(
                    "Table '{}' is defined more than once (again in '{}')",
                    table.name,
                    file.display()
                )));
            }
            tables.push(table);
        }
    }
    Ok(tables)
}
