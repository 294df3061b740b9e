//! Literal SQL statement synthesis.
//!
//! Statements never use placeholders: every value is rendered inline by
//! [`render`], so this module is the single place that owns value escaping.

use crate::error::{Result, RqlError};
use crate::record::Record;
use crate::value::Value;

/// Render a value as an SQL literal.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Text(s) => quote(s),
        Value::Blob(b) => match std::str::from_utf8(b) {
            Ok(s) => quote(s),
            Err(_) => blob_literal(b),
        },
        Value::Real(r) if !r.is_finite() => "null".to_string(),
        Value::Timestamp(_) if value.is_zero_timestamp() => "null".to_string(),
        Value::Timestamp(t) => t.timestamp().to_string(),
        other => other.to_string(),
    }
}

/// Render values separated by `", "`.
pub fn render_list(values: &[Value]) -> String {
    values.iter().map(render).collect::<Vec<_>>().join(", ")
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `X'..'` hex literal, for bytes that are not text.
fn blob_literal(b: &[u8]) -> String {
    let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("X'{hex}'")
}

fn split_fields(fields: &str) -> Vec<&str> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

/// `k1=v1 and k2=v2`
fn predicate<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a Value)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, render(v)))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn mismatch<R: Record + ?Sized>(o: &R, fields: usize, values: usize) -> RqlError {
    RqlError::Schema(format!(
        "{}: {} fields but {} values",
        o.table_name(),
        fields,
        values
    ))
}

/// The `where` predicate identifying `o` by its current key values.
pub fn key_predicate<R: Record + ?Sized>(o: &R) -> Result<String> {
    let keys = o.key_fields();
    if keys.is_empty() {
        return Err(RqlError::NoKeyField);
    }
    if let Some(id) = o.primary() {
        if id == 0 {
            return Err(RqlError::KeyNotSet);
        }
        return Ok(format!("{}={}", keys[0], id));
    }
    let values = o.key_values();
    if values.len() != keys.len() {
        return Err(mismatch(o, keys.len(), values.len()));
    }
    if values.iter().any(Value::is_unset) {
        return Err(RqlError::KeyNotSet);
    }
    Ok(predicate(keys.iter().copied().zip(values.iter())))
}

/// Insert that leaves an existing row alone.
///
/// Key columns come from `key_values`, except an identity that is still 0,
/// which the store assigns. Unset timestamps are left to the column default.
pub fn upsert_query<R: Record + ?Sized>(o: &R) -> Result<String> {
    let keys = o.key_fields();
    let key_values = o.key_values();
    if key_values.len() != keys.len() {
        return Err(mismatch(o, keys.len(), key_values.len()));
    }
    let insert_fields = split_fields(o.insert_fields());
    let insert_values = o.insert_values();
    if insert_values.len() != insert_fields.len() {
        return Err(mismatch(o, insert_fields.len(), insert_values.len()));
    }

    let mut fields: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if o.primary() != Some(0) {
        for (field, value) in keys.iter().copied().zip(key_values) {
            fields.push(field);
            values.push(value);
        }
    }
    for (field, value) in insert_fields.into_iter().zip(insert_values) {
        if keys.contains(&field) || value.is_zero_timestamp() {
            continue;
        }
        fields.push(field);
        values.push(value);
    }

    if fields.is_empty() {
        return Ok(format!("insert into {} default values", o.table_name()));
    }
    let conflict = if keys.is_empty() {
        String::new()
    } else {
        format!("({})", keys.join(","))
    };
    Ok(format!(
        "insert into {} ({}) values ({}) on conflict{} do nothing",
        o.table_name(),
        fields.join(","),
        render_list(&values),
        conflict
    ))
}

/// `update ... set ... where <key predicate>`, or `None` when no column
/// remains to be written.
pub fn update_query<R: Record + ?Sized>(o: &R) -> Result<Option<String>> {
    let where_clause = key_predicate(o)?;
    let keys = o.key_fields();
    let fields = split_fields(o.insert_fields());
    let values = o.update_values();
    if values.len() != fields.len() + keys.len() {
        return Err(mismatch(o, fields.len() + keys.len(), values.len()));
    }

    let set: Vec<String> = fields
        .iter()
        .zip(values.iter())
        .filter(|(field, value)| !keys.contains(*field) && !value.is_zero_timestamp())
        .map(|(field, value)| format!("{}={}", field, render(value)))
        .collect();
    if set.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!(
        "update {} set {} where {}",
        o.table_name(),
        set.join(", "),
        where_clause
    )))
}

pub fn delete_query<R: Record + ?Sized>(o: &R) -> Result<String> {
    let where_clause = key_predicate(o)?;
    Ok(format!("delete from {} where {}", o.table_name(), where_clause))
}

/// Delete by an explicit integer identity. Id 0 never turns into a delete-all.
pub fn delete_by_id_query<R: Record + ?Sized>(o: &R, id: i64) -> Result<String> {
    let keys = o.key_fields();
    if keys.is_empty() || o.primary().is_none() {
        return Err(RqlError::NoKeyField);
    }
    if id == 0 {
        return Err(RqlError::KeyNotSet);
    }
    Ok(format!("delete from {} where {}={}", o.table_name(), keys[0], id))
}

pub fn delete_all_query<R: Record + ?Sized>(o: &R) -> String {
    format!("delete from {}", o.table_name())
}

/// Select matching every `(column, value)` pair, in the order given.
pub fn select_where_query<R: Record + ?Sized>(o: &R, pairs: &[(String, Value)]) -> String {
    let base = format!("select {} from {}", o.select_fields(), o.table_name());
    if pairs.is_empty() {
        return base;
    }
    let where_clause = predicate(pairs.iter().map(|(k, v)| (k.as_str(), v)));
    format!("{} where {}", base, where_clause)
}

pub fn select_by_query<R: Record + ?Sized>(o: &R, key: &str, value: &Value) -> String {
    format!(
        "select {} from {} where {}={}",
        o.select_fields(),
        o.table_name(),
        key,
        render(value)
    )
}

/// List query with an optional trailing clause. A clause whose first word is
/// not `where`, `limit`, `order` or `group` is taken as a predicate.
pub fn list_query(select_fields: &str, table: &str, extra: &str) -> String {
    let base = format!("select {} from {}", select_fields, table);
    let extra = extra.trim();
    if extra.is_empty() {
        return base;
    }
    let first = extra
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default();
    let is_clause = ["where", "limit", "order", "group"]
        .iter()
        .any(|kw| first.eq_ignore_ascii_case(kw));
    if is_clause {
        format!("{} {}", base, extra)
    } else {
        format!("{} where {}", base, extra)
    }
}
