use crate::value::{Receiver, Value};

/// Persistence shape of a mapped record type.
///
/// Implementations are normally generated by `rqlmap-codegen` from field
/// annotations, but can be written by hand. Every positional accessor must
/// agree with [`select_fields`](Record::select_fields) (or
/// [`insert_fields`](Record::insert_fields) for the insert lists): the i-th
/// value or receiver belongs to the i-th field.
pub trait Record {
    /// The name of the sql table
    fn table_name(&self) -> &'static str;

    /// Declared field names of the key, in key order
    fn key_names(&self) -> &'static [&'static str];

    /// Table column names comprising the key, in key order
    fn key_fields(&self) -> &'static [&'static str];

    /// Current values of the key columns
    fn key_values(&self) -> Vec<Value>;

    /// Declared field names in select order
    fn names(&self) -> &'static [&'static str];

    /// Comma separated columns to select: key columns first
    fn select_fields(&self) -> &'static str;

    /// Comma separated columns written on insert and update
    fn insert_fields(&self) -> &'static str;

    /// Values in `insert_fields` order
    fn insert_values(&self) -> Vec<Value>;

    /// Values in `insert_fields` order followed by the key values
    fn update_values(&self) -> Vec<Value>;

    /// Write targets in `select_fields` order
    fn receivers(&mut self) -> Vec<&mut dyn Receiver>;

    /// The integer identity, if the type has exactly one integer key.
    /// `Some(0)` means the identity has not been assigned yet.
    fn primary(&self) -> Option<i64>;

    /// Store an identity assigned by the database. Inert without one.
    fn set_primary(&mut self, id: i64);

    /// `create table` statement for the type
    fn sql_create(&self) -> &'static str;
}

/// Write a store-assigned identity into `field`.
///
/// An id the field cannot hold is logged and dropped; the record keeps its
/// previous identity. Returns whether the field was written.
pub fn assign_identity(field: &mut dyn Receiver, table: &str, id: i64) -> bool {
    match field.receive(Value::Integer(id)) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "{}: assigned id {} does not fit {}: {}",
                table,
                id,
                field.type_name(),
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_identity() {
        let mut id = 0i64;
        assert!(assign_identity(&mut id, "users", 42));
        assert_eq!(id, 42);
    }

    #[test]
    fn test_assign_identity_overflow_keeps_field() {
        let mut id = 7u8;
        assert!(!assign_identity(&mut id, "users", 300));
        assert_eq!(id, 7);
    }
}
