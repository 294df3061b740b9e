use crate::config::Config;
use crate::error::{Result, RqlError};
use crate::list::{with_receivers, RecordList};
use crate::query;
use crate::record::Record;
use crate::store::{RowSet, StoreClient, WriteResult};
use crate::value::{Receiver, Value};

/// Runs synthesized statements for mapped records against a store.
pub struct Db<C> {
    client: C,
    config: Config,
}

impl<C: StoreClient> Db<C> {
    pub fn new(client: C, config: Config) -> Self {
        Db { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn debugf(&self, what: &str, statement: &str) {
        if self.config.debug {
            log::debug!("{}: {}", what, statement);
        }
    }

    /// Run a batch of write statements. The first rejected statement turns
    /// into an error; every rejection is logged.
    pub fn write(&self, statements: &[String]) -> Result<Vec<WriteResult>> {
        for statement in statements {
            self.debugf("write", statement);
        }
        let results = self.client.write(statements)?;
        let mut first = None;
        for (statement, result) in statements.iter().zip(results.iter()) {
            if let Some(message) = &result.error {
                log::error!("statement failed: {} :: {}", statement, message);
                if first.is_none() {
                    first = Some(RqlError::Store {
                        statement: statement.clone(),
                        message: message.clone(),
                    });
                }
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }

    fn write_one(&self, statement: String) -> Result<WriteResult> {
        let mut results = self.write(std::slice::from_ref(&statement))?;
        results.pop().ok_or_else(|| RqlError::Store {
            statement,
            message: "store returned no result".to_string(),
        })
    }

    /// Create the record's table if it does not exist yet.
    pub fn create_table<R: Record + ?Sized>(&self, o: &R) -> Result<()> {
        self.write_one(o.sql_create().to_string())?;
        Ok(())
    }

    /// Insert a new record. An identity assigned by the store is written back.
    pub fn add<R: Record + ?Sized>(&self, o: &mut R) -> Result<()> {
        let result = self.write_one(query::upsert_query(o)?)?;
        if result.last_insert_id != 0 {
            o.set_primary(result.last_insert_id);
        }
        Ok(())
    }

    /// Store a record unless a row with the same key exists.
    pub fn save<R: Record + ?Sized>(&self, o: &mut R) -> Result<()> {
        self.add(o)
    }

    /// Overwrite the stored row with the record's current values.
    pub fn update<R: Record + ?Sized>(&self, o: &R) -> Result<()> {
        match query::update_query(o)? {
            Some(statement) => {
                self.write_one(statement)?;
            }
            None => log::debug!("update {}: nothing to write", o.table_name()),
        }
        Ok(())
    }

    /// Delete the row identified by the record's key.
    pub fn delete<R: Record + ?Sized>(&self, o: &R) -> Result<()> {
        if let Some(id) = o.primary() {
            return self.delete_by_id(o, id);
        }
        self.expect_deleted(query::delete_query(o)?)
    }

    pub fn delete_by_id<R: Record + ?Sized>(&self, o: &R, id: i64) -> Result<()> {
        self.expect_deleted(query::delete_by_id_query(o, id)?)
    }

    /// Delete every row of the record's table.
    pub fn delete_all<R: Record + ?Sized>(&self, o: &R) -> Result<()> {
        self.write_one(query::delete_all_query(o))?;
        Ok(())
    }

    fn expect_deleted(&self, statement: String) -> Result<()> {
        let result = self.write_one(statement)?;
        if result.rows_affected == 0 {
            return Err(RqlError::NothingDeleted);
        }
        Ok(())
    }

    /// Load the first row matching every `(column, value)` pair.
    pub fn load<R, K, V>(&self, o: &mut R, keys: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        R: Record + ?Sized,
        K: Into<String>,
        V: Into<Value>,
    {
        let pairs: Vec<(String, Value)> = keys
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let statement = query::select_where_query(o, &pairs);
        self.get(&mut o.receivers(), statement)
    }

    /// Load the first row whose `key` column equals `value`.
    pub fn load_by<R: Record + ?Sized>(
        &self,
        o: &mut R,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let statement = query::select_by_query(o, key, &value.into());
        self.get(&mut o.receivers(), statement)
    }

    /// Load by integer identity. Only for records with one integer key.
    pub fn load_by_id<R: Record + ?Sized>(&self, o: &mut R, id: i64) -> Result<()> {
        if o.primary().is_none() {
            return Err(RqlError::NoKeyField);
        }
        let key = o.key_fields()[0];
        self.load_by(o, key, id)
    }

    /// Reload the record from its current key values.
    pub fn load_self<R: Record + ?Sized>(&self, o: &mut R) -> Result<()> {
        let keys = o.key_fields();
        if keys.is_empty() {
            return Err(RqlError::NoKeyField);
        }
        if let Some(id) = o.primary() {
            if id == 0 {
                return Err(RqlError::KeyNotSet);
            }
            return self.load_by(o, keys[0], id);
        }
        let values = o.key_values();
        if values.iter().any(Value::is_unset) {
            return Err(RqlError::KeyNotSet);
        }
        if keys.len() == 1 {
            let value = values.into_iter().next().unwrap_or(Value::Null);
            return self.load_by(o, keys[0], value);
        }
        self.load(o, keys.iter().copied().zip(values))
    }

    /// Fill `list` with every row of its table.
    pub fn list<L: RecordList + ?Sized>(&self, list: &mut L) -> Result<()> {
        self.list_query(list, "")
    }

    /// Fill `list` with the rows selected by `extra` (a `where` predicate or
    /// a trailing clause such as `limit 5`).
    pub fn list_query<L: RecordList + ?Sized>(&self, list: &mut L, extra: &str) -> Result<()> {
        let statement = list.sql_get(extra);
        let mut sets = self.query(statement)?;
        for rows in sets.iter_mut() {
            while rows.next() {
                let mut decode = |receivers: &mut [&mut dyn Receiver]| -> Result<()> {
                    rows.scan(receivers)
                        .map_err(|e| with_receivers(e, receivers))
                };
                if let Err(e) = list.sql_results(&mut decode) {
                    log::debug!("scan error: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn query(&self, statement: String) -> Result<Vec<RowSet>> {
        self.debugf("query", &statement);
        self.client
            .query(std::slice::from_ref(&statement))
            .map_err(|e| {
                log::error!("error on query: {:?} :: {}", statement, e);
                e
            })
    }

    /// Decode the first row of `statement` into `receivers`.
    fn get(&self, receivers: &mut [&mut dyn Receiver], statement: String) -> Result<()> {
        let mut sets = self.query(statement)?;
        let rows = sets.first_mut().ok_or(RqlError::NoRows)?;
        if !rows.next() {
            return Err(RqlError::NoRows);
        }
        rows.scan(receivers)
            .map_err(|e| with_receivers(e, receivers))
    }
}
