//! Field partitioning for split models
//!
//! A split table yields four classes. Base carries the writable fields,
//! Update mirrors Base with every field optional, Create adds create-only
//! fields on top of Base, and Read adds system and read-only fields.

use crate::options::{ExclusionOverlap, GeneratorOptions};
use crate::types::{ColumnAttribute, ModelClass, TableDescriptor, Variant};
use crate::{GenerateError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The exclusion set a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExclusionKind {
    Restrict,
    CreateOnly,
    ReadOnly,
}

impl fmt::Display for ExclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExclusionKind::Restrict => "restrict",
            ExclusionKind::CreateOnly => "create-only",
            ExclusionKind::ReadOnly => "read-only",
        })
    }
}

/// Field visibility sets of one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSets {
    /// System fields, exposed by Read only
    pub restrict: BTreeSet<String>,
    pub create_only: BTreeSet<String>,
    pub read_only: BTreeSet<String>,
}

impl ExclusionSets {
    pub fn new(
        restrict: BTreeSet<String>,
        create_only: BTreeSet<String>,
        read_only: BTreeSet<String>,
    ) -> Self {
        Self {
            restrict,
            create_only,
            read_only,
        }
    }

    /// Global sets from `options` merged with the table's own lists
    pub fn for_table(options: &GeneratorOptions, table: &TableDescriptor) -> Self {
        Self {
            restrict: options.restrict_fields.clone(),
            create_only: options
                .create_only_fields
                .union(&table.create_only_fields)
                .cloned()
                .collect(),
            read_only: options
                .read_only_fields
                .union(&table.read_only_fields)
                .cloned()
                .collect(),
        }
    }

    /// Sets containing `key`, in precedence order
    pub fn kinds_of(&self, key: &str) -> Vec<ExclusionKind> {
        let mut kinds = Vec::new();
        if self.restrict.contains(key) {
            kinds.push(ExclusionKind::Restrict);
        }
        if self.create_only.contains(key) {
            kinds.push(ExclusionKind::CreateOnly);
        }
        if self.read_only.contains(key) {
            kinds.push(ExclusionKind::ReadOnly);
        }
        kinds
    }

    /// Fields that appear in more than one set
    pub fn overlaps(&self) -> BTreeMap<&str, Vec<ExclusionKind>> {
        self.restrict
            .iter()
            .chain(&self.create_only)
            .chain(&self.read_only)
            .map(|key| (key.as_str(), self.kinds_of(key)))
            .filter(|(_, kinds)| kinds.len() > 1)
            .collect()
    }

    /// Check the sets are pairwise disjoint for the columns of `table`.
    ///
    /// Only fields naming an actual column matter; an overlap on an unknown
    /// name never reaches the partitioner.
    pub fn validate(&self, table: &TableDescriptor, policy: ExclusionOverlap) -> Result<()> {
        for (field, kinds) in self.overlaps() {
            if table.get_column(field).is_none() {
                continue;
            }
            let sets = kinds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            match policy {
                ExclusionOverlap::Reject => {
                    return Err(GenerateError::AmbiguousFieldClassification {
                        table: table.name.clone(),
                        field: field.to_string(),
                        sets,
                    });
                }
                ExclusionOverlap::Warn => {
                    log::warn!(
                        "Field '{}.{}' is listed in more than one exclusion set ({}); treating it as {}",
                        table.name,
                        field,
                        sets,
                        kinds[0]
                    );
                }
            }
        }
        Ok(())
    }

    /// Entries that name no column of `table`
    pub fn unknown_fields<'s>(&'s self, table: &TableDescriptor) -> Vec<(ExclusionKind, &'s str)> {
        let mut unknown = Vec::new();
        for (kind, set) in [
            (ExclusionKind::CreateOnly, &self.create_only),
            (ExclusionKind::ReadOnly, &self.read_only),
        ] {
            for field in set {
                if table.get_column(field).is_none() {
                    unknown.push((kind, field.as_str()));
                }
            }
        }
        unknown
    }

    /// Column keys not covered by any set
    pub fn base_fields<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> BTreeSet<&'k str> {
        keys.into_iter()
            .filter(|key| self.kinds_of(key).is_empty())
            .collect()
    }
}

/// Splits one table's resolved columns into Base/Create/Update/Read classes
pub struct FieldPartitioner<'s> {
    exclusions: &'s ExclusionSets,
}

impl<'s> FieldPartitioner<'s> {
    pub fn new(exclusions: &'s ExclusionSets) -> Self {
        Self { exclusions }
    }

    /// Partition `columns` (in source order) into the four variants, returned
    /// in render order.
    pub fn split<'a>(
        &self,
        class_name: &str,
        table: &str,
        columns: &[ColumnAttribute<'a>],
    ) -> Vec<ModelClass<'a>> {
        let base_name = format!("{}{}", class_name, Variant::Base.suffix());
        let mut models: Vec<ModelClass<'a>> = Variant::ALL
            .iter()
            .map(|variant| {
                let mut model = ModelClass::new(format!("{}{}", class_name, variant.suffix()), table);
                model.variant = Some(*variant);
                if matches!(variant, Variant::Create | Variant::Read) {
                    model.parent = Some(base_name.clone());
                }
                model
            })
            .collect();

        let base_fields = self.exclusions.base_fields(columns.iter().map(|c| c.key.as_str()));

        for column in columns {
            let key = column.key.as_str();
            if self.exclusions.restrict.contains(key) {
                models[Variant::Read as usize].columns.push(column.clone());
            } else if base_fields.contains(key) {
                models[Variant::Base as usize].columns.push(column.clone());
                models[Variant::Update as usize]
                    .columns
                    .push(column.forced_optional());
            } else if self.exclusions.create_only.contains(key) {
                models[Variant::Create as usize].columns.push(column.clone());
            } else if self.exclusions.read_only.contains(key) {
                models[Variant::Read as usize].columns.push(column.clone());
            }
        }

        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDescriptor;

    fn set(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn table() -> TableDescriptor {
        TableDescriptor::new("mp_event")
            .with_column(ColumnDescriptor::new("id", "INTEGER").primary_key())
            .with_column(ColumnDescriptor::new("topic_name", "VARCHAR(64)").not_null())
            .with_column(ColumnDescriptor::new("message", "TEXT").not_null())
            .with_column(ColumnDescriptor::new("created_at", "DATETIME").not_null())
            .with_column(ColumnDescriptor::new("secret", "TEXT"))
    }

    fn attributes(table: &TableDescriptor) -> Vec<ColumnAttribute<'_>> {
        table
            .columns
            .iter()
            .map(|c| ColumnAttribute::new(c, "str".to_string()))
            .collect()
    }

    #[test]
    fn test_split_assigns_every_column_once() {
        let table = table();
        let exclusions = ExclusionSets::new(
            set(&["id", "created_at"]),
            set(&["secret"]),
            set(&["topic_name"]),
        );
        let columns = attributes(&table);
        let models = FieldPartitioner::new(&exclusions).split("MPEvent", &table.name, &columns);

        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["MPEventBase", "MPEventCreate", "MPEventUpdate", "MPEventRead"]);

        assert_eq!(models[0].column_keys(), vec!["message"]);
        assert_eq!(models[1].column_keys(), vec!["secret"]);
        assert_eq!(models[2].column_keys(), vec!["message"]);
        assert_eq!(models[3].column_keys(), vec!["id", "topic_name", "created_at"]);

        assert_eq!(models[0].parent, None);
        assert_eq!(models[1].parent.as_deref(), Some("MPEventBase"));
        assert_eq!(models[2].parent, None);
        assert_eq!(models[3].parent.as_deref(), Some("MPEventBase"));
    }

    #[test]
    fn test_update_fields_are_forced_optional() {
        let table = table();
        let exclusions = ExclusionSets::new(set(&["id"]), BTreeSet::new(), BTreeSet::new());
        let columns = attributes(&table);
        let models = FieldPartitioner::new(&exclusions).split("MPEvent", &table.name, &columns);

        assert!(models[0].columns.iter().any(|c| !c.is_optional()));
        assert!(models[2].columns.iter().all(|c| c.is_optional()));
        assert_eq!(models[0].column_keys(), models[2].column_keys());
    }

    #[test]
    fn test_overlap_rejected() {
        let table = table();
        let exclusions = ExclusionSets::new(set(&["id"]), set(&["id"]), BTreeSet::new());
        let err = exclusions
            .validate(&table, ExclusionOverlap::Reject)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::AmbiguousFieldClassification { ref field, ref sets, .. }
                if field == "id" && sets == "restrict, create-only"
        ));
    }

    #[test]
    fn test_overlap_warn_applies_precedence() {
        let table = table();
        let exclusions = ExclusionSets::new(set(&["id"]), set(&["id", "message"]), set(&["message"]));
        assert!(exclusions.validate(&table, ExclusionOverlap::Warn).is_ok());

        let columns = attributes(&table);
        let models = FieldPartitioner::new(&exclusions).split("MPEvent", &table.name, &columns);
        assert_eq!(models[1].column_keys(), vec!["message"]);
        assert!(models[3].column_keys().contains(&"id"));
        assert!(!models[1].column_keys().contains(&"id"));
    }

    #[test]
    fn test_overlap_on_unknown_field_is_ignored() {
        let table = table();
        let exclusions = ExclusionSets::new(set(&["ghost"]), set(&["ghost"]), BTreeSet::new());
        assert!(exclusions.validate(&table, ExclusionOverlap::Reject).is_ok());
    }

    #[test]
    fn test_for_table_merges_sets() {
        let options = GeneratorOptions {
            read_only_fields: set(&["secret"]),
            ..Default::default()
        };
        let table = table().with_create_only(["topic_name"]).with_read_only(["ghost"]);
        let exclusions = ExclusionSets::for_table(&options, &table);

        assert_eq!(exclusions.create_only, set(&["topic_name"]));
        assert_eq!(exclusions.read_only, set(&["ghost", "secret"]));
        assert_eq!(
            exclusions.unknown_fields(&table),
            vec![(ExclusionKind::ReadOnly, "ghost")]
        );
    }
}
