//! TypeORM entity rendering.
//!
//! One table becomes one self-contained TypeScript file. Rendering is pure
//! and deterministic: the same descriptor always yields the same bytes.
//!
//! Field order is fixed:
//!
//! 1. primary key columns, catalog ordinal order
//! 2. remaining plain columns, catalog ordinal order
//! 3. relations, foreign key discovery order

use std::collections::BTreeMap;

use crate::config::GeneratorConfig;
use crate::core::schema::{ColumnDescriptor, PrimaryKeyStrategy, TableDescriptor};
use crate::defaults::{plain_default, DefaultValue};
use crate::naming::{double_quoted, entity_file_name, property_key, single_quoted, type_name};
use crate::relations::{resolve, RelationField, ResolvedColumns};
use crate::typemap::map_type;

/// First line of every generated file.
pub const HEADER: &str =
    "// Generated by pg-entitygen from the database catalog. Manual edits are overwritten.";

const TYPEORM_IMPORT: &str =
    "import { Entity, PrimaryGeneratedColumn, PrimaryColumn, Column, ManyToOne, JoinColumn } from 'typeorm';";

/// A rendered entity file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntityFile {
    /// Source table.
    pub table: String,
    /// File name inside the output directory.
    pub file_name: String,
    /// Full file contents.
    pub contents: String,
}

/// Resolve and render one table with the generator settings.
pub fn emit_entity(table: &TableDescriptor, config: &GeneratorConfig) -> GeneratedEntityFile {
    let resolved = resolve(table, &config.reference_suffix);
    let strategies = primary_key_strategies(table, &resolved);
    let contents = render_entity(table, &resolved, &strategies, &config.file_suffix);

    GeneratedEntityFile {
        table: table.name.clone(),
        file_name: entity_file_name(&table.name, &config.file_suffix),
        contents,
    }
}

/// Select a strategy for every primary key column that is emitted as a plain field.
pub fn primary_key_strategies<'a>(
    table: &TableDescriptor,
    resolved: &ResolvedColumns<'a>,
) -> BTreeMap<&'a str, PrimaryKeyStrategy> {
    resolved
        .plain
        .iter()
        .copied()
        .filter(|col| table.is_primary(&col.name))
        .map(|col| (col.name.as_str(), PrimaryKeyStrategy::select(col)))
        .collect()
}

/// Render the entity source text.
///
/// `file_suffix` is the entity file suffix; imports of related entities
/// reference their files without the `.ts` extension.
pub fn render_entity(
    table: &TableDescriptor,
    resolved: &ResolvedColumns<'_>,
    strategies: &BTreeMap<&str, PrimaryKeyStrategy>,
    file_suffix: &str,
) -> String {
    let class_name = type_name(&table.name);
    let module_suffix = file_suffix.strip_suffix(".ts").unwrap_or(file_suffix);

    let mut lines: Vec<String> = vec![HEADER.to_string(), TYPEORM_IMPORT.to_string()];
    for related in related_types(&class_name, &resolved.relations) {
        lines.push(format!(
            "import {{ {} }} from {};",
            related,
            single_quoted(&format!("./{}{}", related, module_suffix))
        ));
    }
    lines.push(String::new());
    lines.push(format!("@Entity({})", single_quoted(&table.name)));
    lines.push(format!("export class {} {{", class_name));

    let mut out = lines.join("\n");
    out.push('\n');
    out.push_str(&entity_fields(table, resolved, strategies).join("\n"));
    out.push_str("}\n");
    out
}

/// Field blocks in emission order: keys, plain columns, relations.
fn entity_fields(
    table: &TableDescriptor,
    resolved: &ResolvedColumns<'_>,
    strategies: &BTreeMap<&str, PrimaryKeyStrategy>,
) -> Vec<String> {
    let (keys, others): (Vec<&ColumnDescriptor>, Vec<&ColumnDescriptor>) = resolved
        .plain
        .iter()
        .copied()
        .partition(|col| strategies.contains_key(col.name.as_str()));

    let mut fields: Vec<String> =
        Vec::with_capacity(resolved.plain.len() + resolved.relations.len());
    for col in keys {
        let strategy = strategies[col.name.as_str()];
        fields.push(primary_key_field(col, strategy));
    }
    for col in others {
        let field = match table.enum_labels_for(&col.name) {
            Some(labels) => enum_field(col, labels),
            None => column_field(col),
        };
        fields.push(field);
    }
    for relation in &resolved.relations {
        fields.push(relation_field(relation));
    }
    fields
}

/// Distinct related type names in first-encountered order, minus the entity itself.
fn related_types<'r>(class_name: &str, relations: &'r [RelationField]) -> Vec<&'r str> {
    let mut seen: Vec<&str> = Vec::new();
    for relation in relations {
        let target = relation.target_type.as_str();
        if target != class_name && !seen.contains(&target) {
            seen.push(target);
        }
    }
    seen
}

fn primary_key_field(col: &ColumnDescriptor, strategy: PrimaryKeyStrategy) -> String {
    let name = single_quoted(&col.name);
    let (decorator, ts_type) = match strategy {
        PrimaryKeyStrategy::GeneratedUuid => (
            format!("@PrimaryGeneratedColumn('uuid', {{ name: {} }})", name),
            "string",
        ),
        PrimaryKeyStrategy::GeneratedSequence => {
            (format!("@PrimaryGeneratedColumn({{ name: {} }})", name), "number")
        }
        PrimaryKeyStrategy::Plain => (
            format!("@PrimaryColumn({{ name: {} }})", name),
            map_type(&col.data_type, &col.udt_name).ts_type,
        ),
    };

    format!(
        "  {}\n  {}: {};\n",
        decorator,
        property_key(&col.name),
        ts_type
    )
}

fn enum_field(col: &ColumnDescriptor, labels: &[String]) -> String {
    let quoted: Vec<String> = labels.iter().map(|l| double_quoted(l)).collect();

    let mut options = vec![
        format!("name: {}", single_quoted(&col.name)),
        format!("enum: [{}]", quoted.join(", ")),
    ];
    if col.is_nullable {
        options.push("nullable: true".to_string());
    }

    let mut ts_type = quoted.join(" | ");
    if col.is_nullable {
        ts_type.push_str(" | null");
    }

    format!(
        "  @Column('enum', {{ {} }})\n  {}: {};\n",
        options.join(", "),
        property_key(&col.name),
        ts_type
    )
}

fn column_field(col: &ColumnDescriptor) -> String {
    let mapping = map_type(&col.data_type, &col.udt_name);

    let mut options = vec![format!("name: {}", single_quoted(&col.name))];
    if col.is_nullable {
        options.push("nullable: true".to_string());
    }
    if let Some(length) = col.max_length {
        options.push(format!("length: {}", length));
    }
    if let Some(default) = plain_default(col.default.as_deref()) {
        options.push(format!("default: {}", default_option(&default)));
    }

    format!(
        "  @Column({}, {{ {} }})\n  {}: {}{};\n",
        single_quoted(&mapping.storage_kind),
        options.join(", "),
        property_key(&col.name),
        mapping.ts_type,
        if col.is_nullable { " | null" } else { "" }
    )
}

fn default_option(default: &DefaultValue<'_>) -> String {
    if default.is_literal() {
        default.raw().to_string()
    } else {
        format!("() => {}", double_quoted(default.raw()))
    }
}

fn relation_field(relation: &RelationField) -> String {
    format!(
        "  @ManyToOne(() => {target})\n  @JoinColumn({{ name: {join} }})\n  {prop}: {target};\n",
        target = relation.target_type,
        join = single_quoted(&relation.join_column),
        prop = property_key(&relation.property),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{EnumLabels, ForeignKeyDescriptor};

    fn column(name: &str, data_type: &str, nullable: bool, default: Option<&str>) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length: None,
            is_nullable: nullable,
            default: default.map(str::to_string),
            udt_name: String::new(),
        }
    }

    fn fk(column: &str, ref_table: &str) -> ForeignKeyDescriptor {
        ForeignKeyDescriptor {
            column: column.to_string(),
            ref_table: ref_table.to_string(),
            ref_column: "id".to_string(),
        }
    }

    fn orders_table() -> TableDescriptor {
        let mut status = column("status", "USER-DEFINED", false, Some("'pending'::order_status"));
        status.udt_name = "order_status".to_string();

        TableDescriptor {
            name: "orders".to_string(),
            columns: vec![
                column("id", "uuid", false, Some("gen_random_uuid()")),
                column("customer_id", "integer", false, None),
                status,
                column("total", "numeric", true, None),
            ],
            primary_key: vec!["id".to_string()],
            foreign_keys: vec![fk("customer_id", "customers")],
            enum_labels: [("status", "pending"), ("status", "paid"), ("status", "shipped")]
                .into_iter()
                .collect::<EnumLabels>(),
        }
    }

    #[test]
    fn test_orders_scenario() {
        let file = emit_entity(&orders_table(), &GeneratorConfig::default());
        assert_eq!(file.file_name, "Orders.entity.ts");

        let expected = format!(
            "{HEADER}\n{TYPEORM_IMPORT}\n\
import {{ Customers }} from './Customers.entity';

@Entity('orders')
export class Orders {{
  @PrimaryGeneratedColumn('uuid', {{ name: 'id' }})
  id: string;

  @Column('enum', {{ name: 'status', enum: [\"pending\", \"paid\", \"shipped\"] }})
  status: \"pending\" | \"paid\" | \"shipped\";

  @Column('decimal', {{ name: 'total', nullable: true }})
  total: number | null;

  @ManyToOne(() => Customers)
  @JoinColumn({{ name: 'customer_id' }})
  customer: Customers;
}}
"
        );
        assert_eq!(file.contents, expected);
    }

    #[test]
    fn test_output_is_deterministic() {
        let config = GeneratorConfig::default();
        let first = emit_entity(&orders_table(), &config);
        let second = emit_entity(&orders_table(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sequence_pk_default_not_reemitted() {
        let mut table = TableDescriptor::new("users");
        table.columns = vec![
            column("id", "integer", false, Some("nextval('users_id_seq'::regclass)")),
            column("legacy_no", "bigint", true, Some("nextval('legacy_seq'::regclass)")),
        ];
        table.primary_key = vec!["id".to_string()];

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert!(contents.contains("  @PrimaryGeneratedColumn({ name: 'id' })\n  id: number;\n"));
        assert!(contents
            .contains("  @Column('bigint', { name: 'legacy_no', nullable: true })\n  legacy_no: string | null;\n"));
        assert!(!contents.contains("nextval"));
    }

    #[test]
    fn test_plain_pk_uses_mapped_type() {
        let mut table = TableDescriptor::new("countries");
        table.columns = vec![column("code", "character", false, None)];
        table.primary_key = vec!["code".to_string()];

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert!(contents.contains("  @PrimaryColumn({ name: 'code' })\n  code: string;\n"));
    }

    #[test]
    fn test_primary_keys_come_first() {
        let mut table = TableDescriptor::new("line_items");
        table.columns = vec![
            column("note", "text", true, None),
            column("id", "integer", false, Some("nextval('line_items_id_seq'::regclass)")),
            column("qty", "integer", false, Some("1")),
        ];
        table.primary_key = vec!["id".to_string()];

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        let id = contents.find("  id: number;").unwrap();
        let note = contents.find("  note: string | null;").unwrap();
        let qty = contents.find("  qty: number;").unwrap();
        assert!(id < note && note < qty);
        assert!(contents.contains("export class LineItems {"));
    }

    #[test]
    fn test_column_options_and_defaults() {
        let mut name = column("name", "character varying", false, Some("'anonymous'::character varying"));
        name.max_length = Some(120);
        let mut table = TableDescriptor::new("profiles");
        table.columns = vec![
            name,
            column("code", "text", false, Some("'x'")),
            column("active", "boolean", false, Some("true")),
            column("score", "integer", true, Some("0")),
            column("created_at", "timestamp with time zone", false, Some("now()")),
            column("tags", "ARRAY", true, None),
        ];

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert!(contents.contains(
            "  @Column('varchar', { name: 'name', length: 120, default: () => \"'anonymous'::character varying\" })\n  name: string;\n"
        ));
        assert!(contents.contains("  @Column('text', { name: 'code', default: 'x' })\n"));
        assert!(contents.contains("  @Column('boolean', { name: 'active', default: true })\n  active: boolean;\n"));
        assert!(contents.contains("  @Column('int', { name: 'score', nullable: true, default: 0 })\n"));
        assert!(contents.contains(
            "  @Column('timestamp with time zone', { name: 'created_at', default: () => \"now()\" })\n  created_at: Date;\n"
        ));
        assert!(contents.contains("  @Column('ARRAY', { name: 'tags', nullable: true })\n  tags: any | null;\n"));
    }

    #[test]
    fn test_nullable_enum() {
        let mut table = TableDescriptor::new("tickets");
        table.columns = vec![column("priority", "USER-DEFINED", true, None)];
        table.enum_labels.push("priority", "low");
        table.enum_labels.push("priority", "high");

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert!(contents.contains(
            "  @Column('enum', { name: 'priority', enum: [\"low\", \"high\"], nullable: true })\n  priority: \"low\" | \"high\" | null;\n"
        ));
    }

    #[test]
    fn test_related_imports_are_distinct() {
        let mut table = TableDescriptor::new("transfers");
        table.columns = vec![
            column("from_account_id", "integer", false, None),
            column("to_account_id", "integer", false, None),
            column("parent_id", "integer", true, None),
        ];
        table.foreign_keys = vec![
            fk("from_account_id", "accounts"),
            fk("to_account_id", "accounts"),
            fk("parent_id", "transfers"),
        ];

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert_eq!(contents.matches("import { Accounts }").count(), 1);
        assert!(!contents.contains("import { Transfers }"));
        assert!(contents.contains("  from_account: Accounts;\n"));
        assert!(contents.contains("  to_account: Accounts;\n"));
        assert!(contents.contains("  @ManyToOne(() => Transfers)\n  @JoinColumn({ name: 'parent_id' })\n  parent: Transfers;\n"));
    }

    #[test]
    fn test_mutual_references() {
        let config = GeneratorConfig::default();

        let mut authors = TableDescriptor::new("authors");
        authors.columns = vec![column("featured_book_id", "integer", true, None)];
        authors.foreign_keys = vec![fk("featured_book_id", "books")];

        let mut books = TableDescriptor::new("books");
        books.columns = vec![
            column("author_id", "integer", false, None),
            column("editor_id", "integer", true, None),
        ];
        books.foreign_keys = vec![fk("author_id", "authors"), fk("editor_id", "authors")];

        let authors_file = emit_entity(&authors, &config).contents;
        let books_file = emit_entity(&books, &config).contents;
        assert_eq!(authors_file.matches("import { Books } from './Books.entity';").count(), 1);
        assert_eq!(books_file.matches("import { Authors } from './Authors.entity';").count(), 1);
        assert_eq!(books_file.matches("import {").count(), 2);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let mut table = TableDescriptor::new("odd");
        table.columns = vec![
            column("it's", "text", false, Some("concat('a', \"b\")")),
            column("mood", "USER-DEFINED", false, None),
        ];
        table.enum_labels.push("mood", "say \"hi\"");

        let contents = emit_entity(&table, &GeneratorConfig::default()).contents;
        assert!(contents.contains("name: 'it\\'s'"));
        assert!(contents.contains("default: () => \"concat('a', \\\"b\\\")\""));
        assert!(contents.contains("  'it\\'s': string;\n"));
        assert!(contents.contains("enum: [\"say \\\"hi\\\"\"]"));
    }

    #[test]
    fn test_custom_suffixes() {
        let config = GeneratorConfig {
            file_suffix: ".model.ts".to_string(),
            reference_suffix: "_ref".to_string(),
            ..GeneratorConfig::default()
        };
        let mut table = TableDescriptor::new("posts");
        table.columns = vec![column("owner_ref", "integer", false, None)];
        table.foreign_keys = vec![fk("owner_ref", "users")];

        let file = emit_entity(&table, &config);
        assert_eq!(file.file_name, "Posts.model.ts");
        assert!(file.contents.contains("import { Users } from './Users.model';"));
        assert!(file.contents.contains("  owner: Users;\n"));
    }
}
