//! Normalized persistence mapping of a record type.

mod builder;
mod ddl;
mod types;

pub use builder::{FieldSpec, SchemaBuilder};
pub use types::{Column, ColumnType, SchemaModel};
