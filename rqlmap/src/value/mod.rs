//! Scalars exchanged with the store, and the conversions between them and
//! record fields.

pub(crate) mod receiver;

pub use receiver::Receiver;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Text(String),
    Blob(Vec<u8>),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// True for a timestamp that was never set (the `Default` of `DateTime<Utc>`).
    pub fn is_zero_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(t) if *t == DateTime::<Utc>::default())
    }

    /// True when the value cannot identify a row: null, 0, empty text or blob,
    /// or an unset timestamp.
    pub fn is_unset(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Integer(n) => *n == 0,
            Value::Text(s) => s.is_empty(),
            Value::Blob(b) => b.is_empty(),
            Value::Timestamp(_) => self.is_zero_timestamp(),
            Value::Real(_) | Value::Bool(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Bool(_) => "bool",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<rusqlite::types::Value> for Value {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value as Sql;
        match value {
            Sql::Null => Value::Null,
            Sql::Integer(n) => Value::Integer(n),
            Sql::Real(r) => Value::Real(r),
            Sql::Text(s) => Value::Text(s),
            Sql::Blob(b) => Value::Blob(b),
        }
    }
}

/// Read a record field as a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! integer_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(n) => Value::Integer(n),
                        // too wide for the store's integers: keep every digit
                        Err(_) => Value::Text(self.to_string()),
                    }
                }
            }
        )*
    };
}

integer_to_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.and_utc())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> From<&T> for Value {
    fn from(value: &T) -> Self {
        value.to_value()
    }
}

macro_rules! value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    value.to_value()
                }
            }
        )*
    };
}

value_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Vec<u8>);
value_from!(DateTime<Utc>, NaiveDateTime);

impl<T: ToValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zero_timestamp() {
        assert!(Value::Timestamp(DateTime::<Utc>::default()).is_zero_timestamp());
        let set = Utc.with_ymd_and_hms(2001, 9, 10, 11, 11, 11).unwrap();
        assert!(!Value::Timestamp(set).is_zero_timestamp());
    }

    #[test]
    fn test_is_unset() {
        assert!(Value::Null.is_unset());
        assert!(Value::Integer(0).is_unset());
        assert!(Value::Text(String::new()).is_unset());
        assert!(!Value::Integer(7).is_unset());
        assert!(!Value::Text("a".into()).is_unset());
        assert!(!Value::Bool(false).is_unset());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(23i32), Value::Integer(23));
        assert_eq!(Value::from("abc"), Value::Text("abc".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(1.5f64)), Value::Real(1.5));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Blob(vec![1, 2]));
        assert_eq!(Value::from(u64::MAX), Value::Text(u64::MAX.to_string()));
        assert_eq!(Value::from(i64::MAX as u64), Value::Integer(i64::MAX));
    }

    #[test]
    fn test_from_sqlite_value() {
        use rusqlite::types::Value as Sql;
        assert_eq!(Value::from(Sql::Integer(4)), Value::Integer(4));
        assert_eq!(Value::from(Sql::Null), Value::Null);
        assert_eq!(Value::from(Sql::Text("x".into())), Value::Text("x".into()));
    }
}
