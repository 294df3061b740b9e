use super::Value;
use crate::error::{Result, RqlError};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

const DATETIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// A record field that can be overwritten from a fetched column value.
///
/// Conversions are lenient the way a dynamically typed store needs: `Null`
/// decodes to the type's default, numbers and text convert where the text
/// parses.
pub trait Receiver: fmt::Debug {
    fn receive(&mut self, value: Value) -> Result<()>;

    /// Name of the receiving type, for diagnostics
    fn type_name(&self) -> &'static str;
}

fn mismatch(target: &str, value: &Value) -> RqlError {
    RqlError::decode(format!(
        "cannot decode {} value {:?} into {}",
        value.kind(),
        value,
        target
    ))
}

macro_rules! integer_receiver {
    ($($t:ty),*) => {
        $(
            impl Receiver for $t {
                fn receive(&mut self, value: Value) -> Result<()> {
                    let n: Option<$t> = match &value {
                        Value::Null => Some(0),
                        Value::Integer(n) => <$t>::try_from(*n).ok(),
                        Value::Bool(b) => Some(<$t>::from(*b)),
                        Value::Real(r)
                            if r.fract() == 0.0
                                && *r >= <$t>::MIN as f64
                                && *r <= <$t>::MAX as f64 =>
                        {
                            Some(*r as $t)
                        }
                        Value::Text(s) => s.trim().parse().ok(),
                        Value::Timestamp(t) => <$t>::try_from(t.timestamp()).ok(),
                        _ => None,
                    };
                    *self = n.ok_or_else(|| mismatch(stringify!($t), &value))?;
                    Ok(())
                }

                fn type_name(&self) -> &'static str {
                    stringify!($t)
                }
            }
        )*
    };
}

integer_receiver!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_receiver {
    ($($t:ty),*) => {
        $(
            impl Receiver for $t {
                fn receive(&mut self, value: Value) -> Result<()> {
                    *self = match &value {
                        Value::Null => 0.0,
                        Value::Real(r) => *r as $t,
                        Value::Integer(n) => *n as $t,
                        Value::Text(s) => s.trim().parse().map_err(|_| mismatch(stringify!($t), &value))?,
                        _ => return Err(mismatch(stringify!($t), &value)),
                    };
                    Ok(())
                }

                fn type_name(&self) -> &'static str {
                    stringify!($t)
                }
            }
        )*
    };
}

float_receiver!(f32, f64);

impl Receiver for bool {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = match &value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Text(s) => match s.as_str() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
                "0" | "f" | "F" | "false" | "FALSE" | "False" | "" => false,
                _ => return Err(mismatch("bool", &value)),
            },
            _ => return Err(mismatch("bool", &value)),
        };
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "bool"
    }
}

impl Receiver for String {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = match value {
            Value::Null => String::new(),
            Value::Text(s) => s,
            Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
            other => other.to_string(),
        };
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "String"
    }
}

impl Receiver for Vec<u8> {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = match value {
            Value::Null => Vec::new(),
            Value::Blob(b) => b,
            Value::Text(s) => s.into_bytes(),
            other => return Err(mismatch("Vec<u8>", &other)),
        };
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "Vec<u8>"
    }
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Null => Ok(DateTime::<Utc>::default()),
        Value::Timestamp(t) => Ok(*t),
        Value::Integer(n) => {
            DateTime::<Utc>::from_timestamp(*n, 0).ok_or_else(|| mismatch("DateTime<Utc>", value))
        }
        Value::Text(s) => {
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Ok(t.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, DATETIME_LAYOUT)
                .map(|t| t.and_utc())
                .map_err(|_| mismatch("DateTime<Utc>", value))
        }
        _ => Err(mismatch("DateTime<Utc>", value)),
    }
}

impl Receiver for DateTime<Utc> {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = parse_timestamp(&value)?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "DateTime<Utc>"
    }
}

impl Receiver for NaiveDateTime {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = parse_timestamp(&value)?.naive_utc();
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "NaiveDateTime"
    }
}

impl Receiver for Value {
    fn receive(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "Value"
    }
}

impl<T: Receiver + Default> Receiver for Option<T> {
    fn receive(&mut self, value: Value) -> Result<()> {
        if value == Value::Null {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.receive(value)?;
        *self = Some(inner);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "Option"
    }
}

/// Positional summary of a receiver list: `index:type:value,...`
pub(crate) fn describe(receivers: &[&mut dyn Receiver]) -> String {
    receivers
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}:{}:{:?}", i, r.type_name(), r))
        .collect::<Vec<_>>()
        .join(",")
}
