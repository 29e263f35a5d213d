//! Core catalog abstractions.
//!
//! - [`schema`]: table, column, key and enum label snapshot types
//! - [`traits`]: the [`CatalogReader`] trait implemented by catalog drivers

pub mod schema;
pub mod traits;

pub use schema::{
    ColumnDescriptor, EnumLabels, ForeignKeyDescriptor, PrimaryKeyStrategy, TableDescriptor,
    TableSet,
};
pub use traits::CatalogReader;
