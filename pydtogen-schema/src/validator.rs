//! Table descriptor validation

use crate::codegen::{is_python_identifier, is_python_keyword, python_field_name};
use crate::partition::ExclusionSets;
use crate::{GeneratorOptions, TableDescriptor, ValidationResult, Variant};
use std::collections::{HashMap, HashSet};

/// Table validator
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate all tables of one run and collect every error and warning
    pub fn validate_tables(tables: &[TableDescriptor], options: &GeneratorOptions) -> ValidationResult {
        let mut result = ValidationResult::new();

        // 1. The base model must be importable
        result.merge(Self::validate_options(options));

        // 2. Validate each table individually
        for table in tables {
            result.merge(Self::validate_table(table, options));
        }

        // 3. Generated class names must not collide across tables
        result.merge(Self::validate_class_names(tables, options));

        result
    }

    /// Validate a single table and collect all errors
    pub fn validate_table(table: &TableDescriptor, options: &GeneratorOptions) -> ValidationResult {
        let mut result = ValidationResult::new();

        if table.name.trim().is_empty() {
            result.add_error("Table with empty name".to_string());
        }

        if table.columns.is_empty() {
            result.add_warning(format!("Table '{}' has no columns", table.name));
        }

        let class_name = table.model_name();
        if !is_python_identifier(&class_name) {
            result.add_error(format!(
                "Table '{}' maps to invalid class name '{}'",
                table.name, class_name
            ));
        } else if is_python_keyword(&class_name) {
            result.add_error(format!(
                "Table '{}' maps to reserved class name '{}'",
                table.name, class_name
            ));
        }

        // Column keys and the attribute names they render to
        let mut keys = HashSet::new();
        let mut attributes: HashMap<String, &str> = HashMap::new();
        for column in &table.columns {
            if column.name.trim().is_empty() {
                result.add_error(format!("Table '{}' has a column with empty name", table.name));
                continue;
            }
            if !keys.insert(column.name.as_str()) {
                result.add_error(format!(
                    "Duplicate column '{}.{}'",
                    table.name, column.name
                ));
                continue;
            }
            if !is_python_identifier(&column.name) {
                result.add_error(format!(
                    "Column '{}.{}' is not a valid Python identifier",
                    table.name, column.name
                ));
                continue;
            }
            if let Some(previous) = attributes.insert(python_field_name(&column.name), &column.name) {
                result.add_error(format!(
                    "Columns '{}.{}' and '{}.{}' render to the same attribute name",
                    table.name, previous, table.name, column.name
                ));
            }
        }

        if table.is_split(options.split_models) {
            let exclusions = ExclusionSets::for_table(options, table);
            for (kind, field) in exclusions.unknown_fields(table) {
                result.add_warning(format!(
                    "Table '{}' lists unknown {} field '{}'",
                    table.name, kind, field
                ));
            }
        }

        result
    }

    /// Check the configured base model renders as a valid class reference
    pub fn validate_options(options: &GeneratorOptions) -> ValidationResult {
        let mut result = ValidationResult::new();
        let base = &options.base_model;

        if !is_python_identifier(&base.name) || is_python_keyword(&base.name) {
            result.add_error(format!(
                "Base model '{}' does not name a valid Python class",
                base
            ));
        }
        if let Some(module) = &base.module {
            if !module
                .split('.')
                .all(|part| is_python_identifier(part) && !is_python_keyword(part))
            {
                result.add_error(format!(
                    "Base model '{}' has an invalid module path '{}'",
                    base, module
                ));
            }
        }

        result
    }

    /// Check generated class names, variant suffixes included, are unique
    /// and leave the base model name alone
    fn validate_class_names(tables: &[TableDescriptor], options: &GeneratorOptions) -> ValidationResult {
        let mut result = ValidationResult::new();
        let mut seen: HashMap<String, &str> = HashMap::new();
        let base_name = options.base_model.name.as_str();

        for table in tables {
            let class_name = table.model_name();
            let names: Vec<String> = if table.is_split(options.split_models) {
                Variant::ALL
                    .iter()
                    .map(|variant| format!("{}{}", class_name, variant.suffix()))
                    .collect()
            } else {
                vec![class_name]
            };

            for name in names {
                if name == base_name {
                    result.add_error(format!(
                        "Class '{}' of table '{}' shadows the base model",
                        name, table.name
                    ));
                } else if let Some(other) = seen.get(name.as_str()) {
                    result.add_error(format!(
                        "Class '{}' is generated for both '{}' and '{}'",
                        name, other, table.name
                    ));
                } else {
                    seen.insert(name, &table.name);
                }
            }
        }

        result
    }
}
