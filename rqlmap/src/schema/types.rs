use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Persistence mapping of one record type, built once from its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Record type name
    pub name: String,
    pub table: String,
    /// Non-key columns in declaration order
    pub columns: Vec<Column>,
    /// Key columns in declaration order
    pub key_columns: Vec<Column>,
    /// Logical names excluded from update and upsert value lists
    pub no_update: BTreeSet<String>,
    /// Logical name -> reference expression, e.g. `users(id)`
    pub foreign_keys: BTreeMap<String, String>,
    /// Exactly one key column and it is an integer
    pub single_integer_primary: bool,
}

/// A single mapped field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Declared field name
    pub field: String,
    /// Logical SQL column name
    pub name: String,
    pub column_type: ColumnType,
    pub key: bool,
    pub no_update: bool,
}

/// SQL type class of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Integer,
    Datetime,
}

impl ColumnType {
    /// Classify a declared type by its bare name (`String`, `i64`, `DateTime`, ...).
    pub fn infer(type_name: &str) -> Self {
        match type_name {
            "String" | "str" => ColumnType::Text,
            "DateTime" | "NaiveDateTime" => ColumnType::Datetime,
            "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
                ColumnType::Integer
            }
            _ => ColumnType::Text,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Datetime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl SchemaModel {
    /// Key columns followed by non-key columns. Every positional accessor
    /// (fields, names, receivers) follows this order.
    pub fn select_columns(&self) -> impl Iterator<Item = &Column> {
        self.key_columns.iter().chain(self.columns.iter())
    }

    /// Non-key columns that are written on insert and update.
    pub fn insert_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(move |c| !self.no_update.contains(&c.name))
    }

    pub fn select_fields(&self) -> String {
        join_names(self.select_columns())
    }

    pub fn insert_fields(&self) -> String {
        join_names(self.insert_columns())
    }

    /// Logical names of the key columns
    pub fn key_fields(&self) -> Vec<&str> {
        self.key_columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Declared field names of the key columns
    pub fn key_names(&self) -> Vec<&str> {
        self.key_columns.iter().map(|c| c.field.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.select_columns().find(|c| c.name == name)
    }
}

fn join_names<'a>(columns: impl Iterator<Item = &'a Column>) -> String {
    columns
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
