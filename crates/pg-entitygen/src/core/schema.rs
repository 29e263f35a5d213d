//! Catalog snapshot types for tables, columns, keys and enum labels.
//!
//! These are read-only snapshots built fresh from the live catalog on every
//! run. Nothing mutates a [`TableDescriptor`] once the introspector has
//! returned it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker that identifies a sequence-backed column default.
pub const SEQUENCE_DEFAULT_MARKER: &str = "nextval";

/// Native type name of universally-unique identifier columns.
pub const UUID_TYPE: &str = "uuid";

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,

    /// Column definitions in catalog ordinal order.
    pub columns: Vec<ColumnDescriptor>,

    /// Primary key column names.
    pub primary_key: Vec<String>,

    /// Foreign keys in discovery order.
    pub foreign_keys: Vec<ForeignKeyDescriptor>,

    /// Enum labels for enum-typed columns.
    pub enum_labels: EnumLabels,
}

impl TableDescriptor {
    /// Create an empty descriptor for a table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            enum_labels: EnumLabels::default(),
        }
    }

    /// Check if a column is part of the primary key.
    pub fn is_primary(&self, column: &str) -> bool {
        self.primary_key.iter().any(|pk| pk == column)
    }

    /// Find the foreign key whose local column is `column`.
    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKeyDescriptor> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }

    /// Enum labels of a column, unless the column is a foreign key.
    pub fn enum_labels_for(&self, column: &str) -> Option<&[String]> {
        if self.foreign_key_for(column).is_some() {
            return None;
        }
        self.enum_labels.get(column)
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Native type name (`information_schema.columns.data_type`).
    pub data_type: String,

    /// Declared maximum character length.
    pub max_length: Option<i32>,

    /// Whether the column accepts NULL.
    pub is_nullable: bool,

    /// Raw default expression.
    pub default: Option<String>,

    /// Underlying concrete type name (`udt_name`).
    pub udt_name: String,
}

impl ColumnDescriptor {
    /// Check if the default expression is backed by a sequence.
    pub fn has_sequence_default(&self) -> bool {
        self.default
            .as_deref()
            .is_some_and(|d| d.contains(SEQUENCE_DEFAULT_MARKER))
    }
}

/// Foreign key metadata (single column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Local column name.
    pub column: String,

    /// Referenced table name.
    pub ref_table: String,

    /// Referenced column name.
    pub ref_column: String,
}

/// Ordered multimap from column name to its enum labels.
///
/// Labels keep the catalog sort order; the order drives the generated
/// literal union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumLabels(BTreeMap<String, Vec<String>>);

impl EnumLabels {
    /// Append a label to a column's list.
    pub fn push(&mut self, column: impl Into<String>, label: impl Into<String>) {
        self.0.entry(column.into()).or_default().push(label.into());
    }

    /// Labels of a column.
    pub fn get(&self, column: &str) -> Option<&[String]> {
        self.0.get(column).map(Vec::as_slice)
    }

    /// Number of enum-typed columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no column has enum labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, L: Into<String>> FromIterator<(C, L)> for EnumLabels {
    fn from_iter<I: IntoIterator<Item = (C, L)>>(iter: I) -> Self {
        let mut labels = EnumLabels::default();
        for (column, label) in iter {
            labels.push(column, label);
        }
        labels
    }
}

/// How a primary key column gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyStrategy {
    /// Generated universally-unique identifier.
    GeneratedUuid,
    /// Sequence-backed generated integer.
    GeneratedSequence,
    /// Value supplied by the caller.
    Plain,
}

impl PrimaryKeyStrategy {
    /// Select the strategy for a primary key column.
    ///
    /// A uuid column always wins over its default expression; a sequence
    /// default comes next; anything else is a plain value.
    pub fn select(column: &ColumnDescriptor) -> Self {
        if column.data_type == UUID_TYPE {
            PrimaryKeyStrategy::GeneratedUuid
        } else if column.has_sequence_default() {
            PrimaryKeyStrategy::GeneratedSequence
        } else {
            PrimaryKeyStrategy::Plain
        }
    }
}

/// Tables resolved for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSet {
    /// Existing base tables to generate, ordered by name.
    pub found: Vec<String>,

    /// Requested tables that do not exist, in request order.
    pub missing: Vec<String>,
}

impl TableSet {
    /// Split a request against the tables that exist.
    ///
    /// Duplicate requests are collapsed; `found` follows the order of
    /// `existing`.
    pub fn partition(requested: &[String], existing: Vec<String>) -> Self {
        let mut missing: Vec<String> = Vec::new();
        for name in requested {
            if !existing.contains(name) && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        Self {
            found: existing,
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str, default: Option<&str>) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length: None,
            is_nullable: false,
            default: default.map(str::to_string),
            udt_name: data_type.to_string(),
        }
    }

    #[test]
    fn test_uuid_pk_ignores_default() {
        let col = column("id", "uuid", Some("nextval('odd_seq'::regclass)"));
        assert_eq!(PrimaryKeyStrategy::select(&col), PrimaryKeyStrategy::GeneratedUuid);

        let col = column("id", "uuid", Some("gen_random_uuid()"));
        assert_eq!(PrimaryKeyStrategy::select(&col), PrimaryKeyStrategy::GeneratedUuid);
    }

    #[test]
    fn test_sequence_pk() {
        let col = column("id", "integer", Some("nextval('users_id_seq'::regclass)"));
        assert_eq!(
            PrimaryKeyStrategy::select(&col),
            PrimaryKeyStrategy::GeneratedSequence
        );
    }

    #[test]
    fn test_plain_pk() {
        assert_eq!(
            PrimaryKeyStrategy::select(&column("code", "character varying", None)),
            PrimaryKeyStrategy::Plain
        );
        assert_eq!(
            PrimaryKeyStrategy::select(&column("n", "integer", Some("0"))),
            PrimaryKeyStrategy::Plain
        );
    }

    #[test]
    fn test_enum_labels_keep_order() {
        let labels: EnumLabels = [
            ("status", "pending"),
            ("kind", "b"),
            ("status", "paid"),
            ("status", "shipped"),
            ("kind", "a"),
        ]
        .into_iter()
        .collect();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("status").unwrap(), ["pending", "paid", "shipped"]);
        assert_eq!(labels.get("kind").unwrap(), ["b", "a"]);
        assert!(labels.get("other").is_none());
    }

    #[test]
    fn test_enum_labels_ignored_for_foreign_keys() {
        let mut table = TableDescriptor::new("orders");
        table.enum_labels.push("status", "open");
        table.enum_labels.push("region_id", "eu");
        table.foreign_keys.push(ForeignKeyDescriptor {
            column: "region_id".to_string(),
            ref_table: "regions".to_string(),
            ref_column: "id".to_string(),
        });

        assert!(table.enum_labels_for("status").is_some());
        assert!(table.enum_labels_for("region_id").is_none());
    }

    #[test]
    fn test_table_set_partition() {
        let requested = vec![
            "users".to_string(),
            "ghosts".to_string(),
            "orders".to_string(),
            "ghosts".to_string(),
            "phantoms".to_string(),
        ];
        let set = TableSet::partition(&requested, vec!["orders".to_string(), "users".to_string()]);
        assert_eq!(set.found, vec!["orders", "users"]);
        assert_eq!(set.missing, vec!["ghosts", "phantoms"]);
    }
}
