use super::types::{Column, ColumnType, SchemaModel};
use crate::error::{Result, RqlError};
use heck::ToSnakeCase;
use std::collections::{BTreeMap, BTreeSet};

/// Persistence intent of one annotated field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub field: String,
    pub name: String,
    pub column_type: ColumnType,
    pub key: bool,
    pub no_update: bool,
    pub foreign_key: Option<String>,
}

impl FieldSpec {
    pub fn new(field: impl Into<String>, name: impl Into<String>, column_type: ColumnType) -> Self {
        FieldSpec {
            field: field.into(),
            name: name.into(),
            column_type,
            key: false,
            no_update: false,
            foreign_key: None,
        }
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn no_update(mut self) -> Self {
        self.no_update = true;
        self
    }

    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.foreign_key = Some(target.into());
        self
    }
}

/// Accumulates fields in declaration order and produces an immutable [`SchemaModel`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    table: Option<String>,
    columns: Vec<Column>,
    key_columns: Vec<Column>,
    no_update: BTreeSet<String>,
    foreign_keys: BTreeMap<String, String>,
}

impl SchemaBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        SchemaBuilder {
            name: type_name.into(),
            table: None,
            columns: Vec::new(),
            key_columns: Vec::new(),
            no_update: BTreeSet::new(),
            foreign_keys: BTreeMap::new(),
        }
    }

    /// Override the table name. The last call wins.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(&mut self, spec: FieldSpec) -> Result<&mut Self> {
        let taken = self
            .key_columns
            .iter()
            .chain(self.columns.iter())
            .any(|c| c.name == spec.name);
        if taken {
            return Err(RqlError::Schema(format!(
                "type {} maps column {} more than once",
                self.name, spec.name
            )));
        }

        // keys are never updated
        let no_update = spec.key || spec.no_update;
        if no_update {
            self.no_update.insert(spec.name.clone());
        }
        if let Some(target) = spec.foreign_key {
            self.foreign_keys.insert(spec.name.clone(), target);
        }

        let column = Column {
            field: spec.field,
            name: spec.name,
            column_type: spec.column_type,
            key: spec.key,
            no_update,
        };
        if column.key {
            self.key_columns.push(column);
        } else {
            self.columns.push(column);
        }
        Ok(self)
    }

    /// True when nothing has been mapped yet.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.key_columns.is_empty()
    }

    /// Finish the schema. A type without mapped fields has no schema.
    pub fn build(self) -> Option<SchemaModel> {
        if self.is_empty() {
            return None;
        }
        let single_integer_primary = self.key_columns.len() == 1
            && self.key_columns[0].column_type == ColumnType::Integer;
        let table = self
            .table
            .unwrap_or_else(|| self.name.to_snake_case());
        Some(SchemaModel {
            name: self.name,
            table,
            columns: self.columns,
            key_columns: self.key_columns,
            no_update: self.no_update,
            foreign_keys: self.foreign_keys,
            single_integer_primary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_struct() -> SchemaModel {
        let mut builder = SchemaBuilder::new("TestStruct");
        builder
            .table("test_structs")
            .field(FieldSpec::new("id", "id", ColumnType::Integer).key())
            .unwrap()
            .field(FieldSpec::new("name", "name", ColumnType::Text))
            .unwrap()
            .field(FieldSpec::new("kind", "kind", ColumnType::Integer))
            .unwrap()
            .field(FieldSpec::new("modified", "modified", ColumnType::Datetime).no_update())
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_single_integer_primary() {
        let schema = test_struct();
        assert!(schema.single_integer_primary);
        assert_eq!(schema.table, "test_structs");
        assert_eq!(schema.key_fields(), vec!["id"]);
        assert_eq!(schema.select_fields(), "id,name,kind,modified");
        assert_eq!(schema.insert_fields(), "name,kind");
        assert!(schema.no_update.contains("id"));
        assert!(schema.no_update.contains("modified"));
    }

    #[test]
    fn test_second_integer_key_breaks_primary() {
        let mut builder = SchemaBuilder::new("HasMulti");
        builder
            .field(FieldSpec::new("id", "id", ColumnType::Integer).key())
            .unwrap()
            .field(FieldSpec::new("sec", "other_key", ColumnType::Integer).key())
            .unwrap()
            .field(FieldSpec::new("name", "name", ColumnType::Text))
            .unwrap();
        let schema = builder.build().unwrap();
        assert!(!schema.single_integer_primary);
        assert_eq!(schema.key_fields(), vec!["id", "other_key"]);
        assert_eq!(schema.key_names(), vec!["id", "sec"]);
    }

    #[test]
    fn test_text_key_is_not_primary() {
        let mut builder = SchemaBuilder::new("Tag");
        builder
            .field(FieldSpec::new("label", "label", ColumnType::Text).key())
            .unwrap();
        let schema = builder.build().unwrap();
        assert!(!schema.single_integer_primary);
    }

    #[test]
    fn test_keyless_schema() {
        let mut builder = SchemaBuilder::new("AuditEntry");
        builder
            .field(FieldSpec::new("message", "message", ColumnType::Text))
            .unwrap();
        let schema = builder.build().unwrap();
        assert!(!schema.single_integer_primary);
        assert!(schema.key_columns.is_empty());
        assert_eq!(schema.table, "audit_entry");
    }

    #[test]
    fn test_empty_builder_has_no_schema() {
        assert!(SchemaBuilder::new("Nothing").build().is_none());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut builder = SchemaBuilder::new("Dup");
        builder
            .field(FieldSpec::new("a", "name", ColumnType::Text))
            .unwrap();
        let err = builder
            .field(FieldSpec::new("b", "name", ColumnType::Text))
            .unwrap_err();
        assert!(matches!(err, RqlError::Schema(_)));
    }

    #[test]
    fn test_foreign_key_does_not_change_classification() {
        let mut builder = SchemaBuilder::new("Post");
        builder
            .field(FieldSpec::new("author", "author_id", ColumnType::Integer).references("users(id)"))
            .unwrap();
        let schema = builder.build().unwrap();
        assert_eq!(schema.columns.len(), 1);
        assert_eq!(schema.foreign_keys["author_id"], "users(id)");
    }
}
