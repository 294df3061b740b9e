/// Runtime settings threaded into a [`Db`](crate::Db) handle.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Log every statement at debug level before it is sent to the store.
    pub debug: bool,
}

impl Config {
    pub fn debug() -> Self {
        Config { debug: true }
    }
}
