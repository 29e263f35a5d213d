//! Relation inference from foreign keys.
//!
//! Every foreign key column is lifted out of the plain column list and turned
//! into a many-to-one relation field. The property name comes from a naming
//! convention: the reference suffix (`_id` by default) is stripped from the
//! column name.

use crate::core::schema::{ColumnDescriptor, TableDescriptor};
use crate::naming::type_name;

/// A many-to-one relation derived from a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationField {
    /// Entity property name.
    pub property: String,
    /// Type name of the referenced entity.
    pub target_type: String,
    /// Physical join column.
    pub join_column: String,
}

/// Columns of a table split into plain fields and relations.
#[derive(Debug, Clone)]
pub struct ResolvedColumns<'a> {
    /// Non foreign key columns, in catalog ordinal order.
    pub plain: Vec<&'a ColumnDescriptor>,
    /// Relations, in foreign key discovery order.
    pub relations: Vec<RelationField>,
}

/// Derive a relation property name from a foreign key column.
///
/// Strips a trailing `suffix`. A column that does not end with it, or that
/// would become empty, keeps its name.
pub fn relation_property(column: &str, suffix: &str) -> String {
    match column.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() && !stem.is_empty() => stem.to_string(),
        _ => column.to_string(),
    }
}

/// Partition a table's columns into plain columns and relations.
///
/// A foreign key column yields exactly one relation even when the catalog
/// lists it under several constraints; the first one wins. Property name
/// collisions are left as they are.
pub fn resolve<'a>(table: &'a TableDescriptor, suffix: &str) -> ResolvedColumns<'a> {
    let plain = table
        .columns
        .iter()
        .filter(|col| table.foreign_key_for(&col.name).is_none())
        .collect();

    let mut relations: Vec<RelationField> = Vec::with_capacity(table.foreign_keys.len());
    for fk in &table.foreign_keys {
        if relations.iter().any(|r| r.join_column == fk.column) {
            continue;
        }
        relations.push(RelationField {
            property: relation_property(&fk.column, suffix),
            target_type: type_name(&fk.ref_table),
            join_column: fk.column.clone(),
        });
    }

    ResolvedColumns { plain, relations }
}
