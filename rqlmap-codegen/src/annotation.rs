//! Field annotation parsing.
//!
//! A record type is a struct with named fields. Each mapped field carries the
//! persistence annotation (default `sql`) naming its column, optionally with
//! a `,key` suffix:
//!
//! ```text
//! pub struct User {
//!     #[sql("id,key")] #[table("users")]
//!     pub id: i64,
//!     #[sql("role_id")] #[fk("roles(id)")]
//!     pub role: i64,
//!     #[sql("created")] #[update(false)]
//!     pub created: DateTime<Utc>,
//! }
//! ```
//!
//! Problems with individual annotations are reported as [`ConfigWarning`]s
//! and never abort parsing.

use crate::type_utils::column_type;
use crate::GenerateOptions;
use rqlmap::schema::{FieldSpec, SchemaBuilder, SchemaModel};
use std::fmt;
use syn::ext::IdentExt;
use syn::{Attribute, Expr, ExprLit, Fields, Item, ItemStruct, Lit, Meta};

const TABLE: &str = "table";
const KEY: &str = "key";
const UPDATE: &str = "update";
const FK: &str = "fk";

/// A non-fatal problem with a field's annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub type_name: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type: {} field: {}: {}", self.type_name, self.field, self.message)
    }
}

/// A record type accepted by the parser.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub schema: SchemaModel,
    /// The declaration as written, annotations included
    pub item: ItemStruct,
    pub warnings: Vec<ConfigWarning>,
}

/// True for attributes consumed by the generator (never re-emitted).
pub(crate) fn is_annotation(attr: &Attribute, tag: &str) -> bool {
    attr.path()
        .get_ident()
        .map_or(false, |ident| ident == tag || [TABLE, KEY, UPDATE, FK].iter().any(|a| ident == a))
}

/// Parse every top-level struct of a source file.
pub fn parse_file(file: &syn::File, options: &GenerateOptions) -> Vec<ParsedRecord> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(s) => parse_struct(s, options),
            _ => None,
        })
        .collect()
}

/// Derive the schema of one struct. `None` when the type is filtered out,
/// has no named fields, maps no field, or maps a column twice.
pub fn parse_struct(item: &ItemStruct, options: &GenerateOptions) -> Option<ParsedRecord> {
    let type_name = item.ident.unraw().to_string();
    if !options.prefix.is_empty() && !type_name.starts_with(&options.prefix) {
        log::debug!(
            "skipping type {:?} as it does not have prefix: {:?}",
            type_name,
            options.prefix
        );
        return None;
    }
    if !options.types.is_empty() && !options.types.iter().any(|t| *t == type_name) {
        return None;
    }
    let Fields::Named(fields) = &item.fields else {
        log::debug!("skipping type {:?}: no named fields", type_name);
        return None;
    };
    log::debug!("evaluating type {:?} for {} annotations", type_name, options.tag);

    let mut builder = SchemaBuilder::new(type_name.as_str());
    let mut warnings = Vec::new();
    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let notes = FieldAnnotations::parse(&field.attrs, &options.tag);
        for message in notes.problems {
            let warning = ConfigWarning {
                type_name: type_name.clone(),
                field: field_name.clone(),
                message,
            };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
        if let Some(table) = notes.table {
            builder.table(table);
        }
        let Some(column) = notes.column else {
            continue;
        };

        let mut spec = FieldSpec::new(field_name.as_str(), column, column_type(&field.ty));
        // an explicit suffix wins over the separate annotation
        if notes.key_suffix || notes.key == Some(true) {
            log::debug!("type: {} field: {} is a key", type_name, field_name);
            spec = spec.key();
        }
        if notes.update == Some(false) {
            spec = spec.no_update();
        }
        if let Some(target) = notes.fk {
            log::debug!(
                "type: {} field: {} has foreign key: {}",
                type_name,
                field_name,
                target
            );
            spec = spec.references(target);
        }
        if let Err(e) = builder.field(spec) {
            log::warn!("skipping type {}: {}", type_name, e);
            return None;
        }
    }

    let Some(schema) = builder.build() else {
        log::debug!("skipping type {:?}: no {} annotations", type_name, options.tag);
        return None;
    };
    Some(ParsedRecord {
        schema,
        item: item.clone(),
        warnings,
    })
}

/// Annotations found on a single field.
#[derive(Debug, Default)]
struct FieldAnnotations {
    column: Option<String>,
    key_suffix: bool,
    key: Option<bool>,
    update: Option<bool>,
    table: Option<String>,
    fk: Option<String>,
    problems: Vec<String>,
}

impl FieldAnnotations {
    fn parse(attrs: &[Attribute], tag: &str) -> Self {
        let mut notes = FieldAnnotations::default();
        for attr in attrs {
            let Some(name) = attr.path().get_ident().map(|i| i.to_string()) else {
                continue;
            };
            if name == tag {
                match annotation_text(attr) {
                    Ok(Some(value)) => notes.column_value(&value),
                    Ok(None) => {}
                    Err(e) => notes.problems.push(format!("{}: {}", tag, e)),
                }
                continue;
            }
            match name.as_str() {
                TABLE => match annotation_text(attr) {
                    Ok(Some(table)) if !table.trim().is_empty() => {
                        notes.table = Some(table.trim().to_string())
                    }
                    Ok(_) => notes.problems.push("table: missing table name".to_string()),
                    Err(e) => notes.problems.push(format!("table: {}", e)),
                },
                KEY => notes.key = notes.flag(attr, KEY),
                UPDATE => notes.update = notes.flag(attr, UPDATE),
                FK => match annotation_text(attr) {
                    Ok(Some(target)) if !target.trim().is_empty() => {
                        let target = target.trim().to_string();
                        if !is_reference(&target) {
                            notes.problems.push(format!(
                                "foreign key {:?} is not of the form table(column)",
                                target
                            ));
                        }
                        notes.fk = Some(target);
                    }
                    Ok(_) => notes.problems.push("fk: missing reference".to_string()),
                    Err(e) => notes.problems.push(format!("fk: {}", e)),
                },
                _ => {}
            }
        }
        notes
    }

    /// `"name"` or `"name,key"`. An empty name maps nothing.
    fn column_value(&mut self, value: &str) {
        let mut parts = value.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return;
        }
        self.column = Some(name.to_string());
        for option in parts {
            match option {
                "key" => self.key_suffix = true,
                "" => {}
                other => self
                    .problems
                    .push(format!("invalid option following field name: {}", other)),
            }
        }
    }

    /// A boolean annotation. The bare marker form means true.
    fn flag(&mut self, attr: &Attribute, name: &str) -> Option<bool> {
        match annotation_text(attr) {
            Ok(None) => Some(true),
            Ok(Some(text)) => {
                let parsed = parse_bool(&text);
                if parsed.is_none() {
                    self.problems
                        .push(format!("{}: invalid boolean {:?}", name, text));
                }
                parsed
            }
            Err(e) => {
                self.problems.push(format!("{}: {}", name, e));
                None
            }
        }
    }
}

/// Literal text of `#[name("v")]`, `#[name(true)]` or `#[name = "v"]`.
/// `Ok(None)` for the bare `#[name]` marker.
fn annotation_text(attr: &Attribute) -> Result<Option<String>, String> {
    match &attr.meta {
        Meta::Path(_) => Ok(None),
        Meta::List(list) => {
            let lit: Lit = list.parse_args().map_err(|e| e.to_string())?;
            lit_text(&lit).map(Some)
        }
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit { lit, .. }) => lit_text(lit).map(Some),
            _ => Err("expected a literal value".to_string()),
        },
    }
}

fn lit_text(lit: &Lit) -> Result<String, String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        _ => Err("expected a string, bool or integer literal".to_string()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// `table(column)`
fn is_reference(target: &str) -> bool {
    match target.split_once('(') {
        Some((table, rest)) => {
            !table.trim().is_empty()
                && rest
                    .strip_suffix(')')
                    .map_or(false, |column| !column.trim().is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rqlmap::schema::ColumnType;

    fn parse(src: &str) -> Vec<ParsedRecord> {
        parse_with(src, &GenerateOptions::default())
    }

    fn parse_with(src: &str, options: &GenerateOptions) -> Vec<ParsedRecord> {
        let file = syn::parse_file(src).unwrap();
        parse_file(&file, options)
    }

    const USER: &str = r#"
        pub struct User {
            #[sql("id,key")]
            #[table("users")]
            pub id: i64,
            #[sql("username")]
            pub name: String,
            #[sql("role_id")]
            #[fk("roles(id)")]
            pub role: i64,
            #[sql("created")]
            #[update(false)]
            pub created: DateTime<Utc>,
            pub scratch: String,
        }
    "#;

    #[test]
    fn test_parse_user() {
        let records = parse(USER);
        assert_eq!(records.len(), 1);
        let schema = &records[0].schema;
        assert_eq!(schema.name, "User");
        assert_eq!(schema.table, "users");
        assert_eq!(schema.key_fields(), vec!["id"]);
        assert_eq!(schema.select_fields(), "id,username,role_id,created");
        assert_eq!(schema.insert_fields(), "username,role_id");
        assert!(schema.single_integer_primary);
        assert_eq!(schema.foreign_keys.get("role_id").map(String::as_str), Some("roles(id)"));
        assert_eq!(
            schema.column("created").map(|c| c.column_type),
            Some(ColumnType::Datetime)
        );
        assert!(records[0].warnings.is_empty());
    }

    #[test]
    fn test_default_table_name() {
        let records = parse(
            r#"
            struct TestStruct {
                #[sql("id,key")]
                id: i64,
            }
        "#,
        );
        assert_eq!(records[0].schema.table, "test_struct");
    }

    #[test]
    fn test_separate_key_annotation() {
        let records = parse(
            r#"
            struct HasMany {
                #[sql("id")] #[key(true)]
                id: i64,
                #[sql("family")] #[key("T")]
                family: String,
                #[sql("name")] #[key(false)]
                name: String,
            }
        "#,
        );
        let schema = &records[0].schema;
        assert_eq!(schema.key_fields(), vec!["id", "family"]);
        assert!(!schema.single_integer_primary);
        assert_eq!(schema.insert_fields(), "name");
    }

    #[test]
    fn test_suffix_wins_over_key_annotation() {
        let records = parse(
            r#"
            struct Thing {
                #[sql("id,key")] #[key(false)]
                id: i64,
            }
        "#,
        );
        assert_eq!(records[0].schema.key_fields(), vec!["id"]);
    }

    #[test]
    fn test_name_value_form_and_custom_tag() {
        let options = GenerateOptions {
            tag: "db".to_string(),
            ..Default::default()
        };
        let records = parse_with(
            r#"
            struct Thing {
                #[db = "thing_id,key"]
                id: u32,
                #[sql("ignored")]
                other: String,
                #[db = "label"]
                label: Option<String>,
            }
        "#,
            &options,
        );
        let schema = &records[0].schema;
        assert_eq!(schema.select_fields(), "thing_id,label");
        assert!(schema.single_integer_primary);
    }

    #[test]
    fn test_warnings_do_not_abort() {
        let records = parse(
            r#"
            struct Odd {
                #[sql("id,primary")]
                id: i64,
                #[sql("flag")] #[update("nope")]
                flag: bool,
                #[sql("owner")] #[fk("users")]
                owner: i64,
            }
        "#,
        );
        let record = &records[0];
        let messages: Vec<&str> = record.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "invalid option following field name: primary",
                "update: invalid boolean \"nope\"",
                "foreign key \"users\" is not of the form table(column)",
            ]
        );
        assert_eq!(record.warnings[0].field, "id");
        // neither a key nor excluded from updates
        assert!(record.schema.key_columns.is_empty());
        assert_eq!(record.schema.insert_fields(), "id,flag,owner");
        assert_eq!(
            record.schema.foreign_keys.get("owner").map(String::as_str),
            Some("users")
        );
    }

    #[test]
    fn test_skipped_types() {
        let records = parse(
            r#"
            struct Plain { name: String }
            struct Tuple(#[sql("a")] i64);
            struct Unit;
            struct Dup {
                #[sql("a")] first: i64,
                #[sql("a")] second: i64,
            }
            struct Empty {
                #[sql("")] name: String,
            }
            enum NotAStruct { A }
        "#,
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_type_and_prefix_filters() {
        let src = r#"
            struct DbUser { #[sql("id,key")] id: i64 }
            struct DbRole { #[sql("id,key")] id: i64 }
            struct Other { #[sql("id,key")] id: i64 }
        "#;
        let prefixed = parse_with(
            src,
            &GenerateOptions {
                prefix: "Db".to_string(),
                ..Default::default()
            },
        );
        let names: Vec<&str> = prefixed.iter().map(|r| r.schema.name.as_str()).collect();
        assert_eq!(names, vec!["DbUser", "DbRole"]);

        let chosen = parse_with(
            src,
            &GenerateOptions {
                types: vec!["Other".to_string(), "DbRole".to_string()],
                ..Default::default()
            },
        );
        let names: Vec<&str> = chosen.iter().map(|r| r.schema.name.as_str()).collect();
        assert_eq!(names, vec!["DbRole", "Other"]);
    }

    #[test]
    fn test_table_last_occurrence_wins() {
        let records = parse(
            r#"
            struct T {
                #[sql("a")] #[table("first")] a: i64,
                #[sql("b")] #[table = "second"] b: i64,
            }
        "#,
        );
        assert_eq!(records[0].schema.table, "second");
    }

    #[test]
    fn test_parse_bool() {
        for t in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(t), Some(true), "{t}");
        }
        for f in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(f), Some(false), "{f}");
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_is_reference() {
        assert!(is_reference("users(id)"));
        assert!(!is_reference("users"));
        assert!(!is_reference("(id)"));
        assert!(!is_reference("users()"));
    }
}
