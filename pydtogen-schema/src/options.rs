//! Generator configuration

use crate::imports::DEFAULT_STDLIB_MODULES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Class that generated models inherit from, written `module.Name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BaseModelRef {
    /// Module to import the class from; `None` for a class defined in scope
    pub module: Option<String>,
    pub name: String,
}

impl BaseModelRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            name: name.into(),
        }
    }

    /// A base class that needs no import
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            module: None,
            name: name.into(),
        }
    }
}

impl Default for BaseModelRef {
    fn default() -> Self {
        Self::new("pydantic", "BaseModel")
    }
}

impl From<&str> for BaseModelRef {
    fn from(path: &str) -> Self {
        match path.trim().rsplit_once('.') {
            Some((module, name)) => Self::new(module, name),
            None => Self::local(path.trim()),
        }
    }
}

impl From<String> for BaseModelRef {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<BaseModelRef> for String {
    fn from(base: BaseModelRef) -> Self {
        base.to_string()
    }
}

impl fmt::Display for BaseModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}.{}", module, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// What to render when strict typing and a length or range bound both apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthConstraintPriority {
    /// `StrictStr`, bound dropped
    #[default]
    StrictWins,
    /// `constr(max_length=N)`, strictness dropped
    LengthWins,
    /// `constr(strict=True, max_length=N)`
    Combine,
}

/// Handling of a field listed in more than one exclusion set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionOverlap {
    /// Fail the run
    #[default]
    Reject,
    /// Log a warning; restrict > create-only > read-only
    Warn,
}

/// Options for one [`Generator`](crate::Generator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub base_model: BaseModelRef,

    /// Prefix of every field line
    pub indentation: String,

    /// Split every table into Base/Create/Update/Read classes
    pub split_models: bool,

    /// System fields, exposed by the Read variant only
    pub restrict_fields: BTreeSet<String>,

    /// Create-only fields applied to every table
    pub create_only_fields: BTreeSet<String>,

    /// Read-only fields applied to every table
    pub read_only_fields: BTreeSet<String>,

    pub strict_types: bool,

    /// Render `constr`/`conbytes` for columns with a maximum length
    pub constraint_str_length: bool,

    /// Render `conint` for integer types with a known bit width
    pub constraint_int_length: bool,

    pub length_constraint_priority: LengthConstraintPriority,

    pub exclusion_overlap: ExclusionOverlap,

    /// Packages rendered in the standard library import group
    pub stdlib_modules: BTreeSet<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            base_model: BaseModelRef::default(),
            indentation: "    ".to_string(),
            split_models: false,
            restrict_fields: ["id", "created_at", "updated_at"]
                .into_iter()
                .map(String::from)
                .collect(),
            create_only_fields: BTreeSet::new(),
            read_only_fields: BTreeSet::new(),
            strict_types: false,
            constraint_str_length: true,
            constraint_int_length: true,
            length_constraint_priority: LengthConstraintPriority::default(),
            exclusion_overlap: ExclusionOverlap::default(),
            stdlib_modules: DEFAULT_STDLIB_MODULES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.indentation, "    ");
        assert!(!options.split_models);
        assert!(!options.strict_types);
        assert!(options.constraint_str_length);
        assert!(options.constraint_int_length);
        assert_eq!(
            options.restrict_fields.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["created_at", "id", "updated_at"]
        );
        assert_eq!(options.length_constraint_priority, LengthConstraintPriority::StrictWins);
        assert_eq!(options.exclusion_overlap, ExclusionOverlap::Reject);
        assert!(options.stdlib_modules.contains("typing"));
    }

    #[test]
    fn test_base_model_ref_paths() {
        assert_eq!(
            BaseModelRef::from("pydantic.main.BaseModel"),
            BaseModelRef::new("pydantic.main", "BaseModel")
        );
        assert_eq!(BaseModelRef::from("Base"), BaseModelRef::local("Base"));
        assert_eq!(BaseModelRef::default().to_string(), "pydantic.BaseModel");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: GeneratorOptions = serde_json::from_str(
            r#"{"split_models": true, "base_model": "app.schemas.Schema", "length_constraint_priority": "combine"}"#,
        )
        .unwrap();
        assert!(options.split_models);
        assert_eq!(options.base_model, BaseModelRef::new("app.schemas", "Schema"));
        assert_eq!(options.length_constraint_priority, LengthConstraintPriority::Combine);
        assert!(options.restrict_fields.contains("id"));
    }
}
