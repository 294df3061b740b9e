//! Map plain Rust structs onto tables of an SQLite-compatible store.
//!
//! A mapped type implements [`Record`] (normally generated by
//! `rqlmap-codegen` from field annotations). [`Db`] turns records into
//! literal SQL statements, hands them to a [`StoreClient`], and decodes the
//! returned rows back into the record's fields.

pub mod config;
pub mod error;
pub mod list;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;
mod db;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use db::Db;
pub use error::{Result, RqlError};
pub use list::RecordList;
pub use record::Record;
pub use schema::SchemaModel;
pub use store::{RowSet, SqliteClient, StoreClient, WriteResult};
pub use value::{Receiver, ToValue, Value};
