//! Type mapping from PostgreSQL column types to TypeORM storage kinds and
//! TypeScript types.

use std::borrow::Cow;

/// TypeScript type used when a native type is not recognized.
pub const UNKNOWN_TS_TYPE: &str = "any";

/// Result of mapping one native column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping<'a> {
    /// Column type tag passed to the `@Column` decorator.
    pub storage_kind: Cow<'a, str>,
    /// TypeScript type of the entity property.
    pub ts_type: &'static str,
}

/// Map a PostgreSQL column type.
///
/// `data_type` is `information_schema.columns.data_type`. The concrete
/// `udt_name` is only consulted upstream, where enum columns are told apart
/// from other user-defined types. Unknown types never fail: the storage kind
/// is passed through verbatim and the TypeScript type is [`UNKNOWN_TS_TYPE`].
pub fn map_type<'a>(data_type: &'a str, _udt_name: &str) -> TypeMapping<'a> {
    let (storage_kind, ts_type): (&'static str, &'static str) = match data_type {
        // Integer types
        "smallint" => ("smallint", "number"),
        "integer" => ("int", "number"),
        // bigint exceeds Number precision; the driver hands it back as a string
        "bigint" => ("bigint", "string"),

        // Decimal/floating point
        "numeric" => ("decimal", "number"),
        "real" => ("real", "number"),
        "double precision" => ("double precision", "number"),

        // String types
        "character varying" => ("varchar", "string"),
        "character" => ("char", "string"),
        "text" => ("text", "string"),

        // Boolean
        "boolean" => ("boolean", "boolean"),

        // Date/time types
        "timestamp with time zone" => ("timestamp with time zone", "Date"),
        "timestamp without time zone" => ("timestamp", "Date"),
        "date" => ("date", "Date"),

        // Structured payloads
        "json" => ("json", "string"),
        "jsonb" => ("jsonb", "string"),

        "uuid" => ("uuid", "string"),

        // Enums and other user-defined types
        "USER-DEFINED" => ("enum", "string"),

        // Default fallback
        other => {
            return TypeMapping {
                storage_kind: Cow::Borrowed(other),
                ts_type: UNKNOWN_TS_TYPE,
            }
        }
    };

    TypeMapping {
        storage_kind: Cow::Borrowed(storage_kind),
        ts_type,
    }
}
