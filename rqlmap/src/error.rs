use thiserror::Error;

#[derive(Error, Debug)]
pub enum RqlError {
    #[error("table has no key field")]
    NoKeyField,

    #[error("key is not set")]
    KeyNotSet,

    #[error("no rows in result set")]
    NoRows,

    #[error("no rows deleted")]
    NothingDeleted,

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store error: {message} (statement: {statement})")]
    Store { statement: String, message: String },

    #[error("Decode error: {message}: with receivers: {receivers}")]
    Decode { message: String, receivers: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RqlError {
    /// True when a select found nothing, as opposed to failing.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, RqlError::NoRows)
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        RqlError::Decode {
            message: message.into(),
            receivers: String::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RqlError>;
