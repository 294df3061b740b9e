use super::types::{ColumnType, SchemaModel};
use crate::error::{Result, RqlError};
use std::collections::{BTreeMap, BTreeSet};

impl SchemaModel {
    /// `create table if not exists` statement for this schema.
    pub fn create_table_sql(&self) -> Result<String> {
        let fields: Vec<&str> = self.select_columns().map(|c| c.name.as_str()).collect();
        let types: Vec<ColumnType> = self.select_columns().map(|c| c.column_type).collect();
        let keys: BTreeSet<&str> = self.key_columns.iter().map(|c| c.name.as_str()).collect();
        let rows = column_definitions(
            &fields,
            &types,
            &keys,
            &self.foreign_keys,
            self.single_integer_primary,
        )?;
        Ok(format!(
            "create table if not exists {} (\n{}\n);",
            self.table, rows
        ))
    }
}

/// One definition per column, key columns first.
///
/// The integer identity gets a column level `primary key`; any other key set
/// becomes a table level constraint so conflict targets have an index.
fn column_definitions(
    fields: &[&str],
    types: &[ColumnType],
    keys: &BTreeSet<&str>,
    foreign_keys: &BTreeMap<String, String>,
    primary: bool,
) -> Result<String> {
    if fields.len() != types.len() {
        return Err(RqlError::Schema(format!(
            "slice sizes don't match for fields:{} -- types:{}",
            fields.len(),
            types.len()
        )));
    }

    let mut rows = Vec::with_capacity(fields.len() + 1);
    for (i, field) in fields.iter().enumerate() {
        let mut row = format!("  {} {}", field, types[i]);
        if primary && i == 0 && keys.contains(field) {
            row.push_str(" primary key");
        }
        if let Some(target) = foreign_keys.get(*field) {
            log::debug!("field: {} applying fk: {}", field, target);
            row.push_str(" references ");
            row.push_str(target);
            row.push_str(" on update cascade");
        }
        rows.push(row);
    }

    if !primary && !keys.is_empty() {
        // keep declaration order, not set order
        let ordered: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| keys.contains(f))
            .collect();
        rows.push(format!("  primary key ({})", ordered.join(", ")));
    }

    Ok(rows.join(",\n"))
}
