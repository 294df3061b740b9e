use crate::error::{Result, RqlError};
use crate::query;
use crate::record::Record;
use crate::value::receiver::describe;
use crate::value::Receiver;

/// Callback that decodes the current row into the given receivers.
pub type Decoder<'a> = dyn FnMut(&mut [&mut dyn Receiver]) -> Result<()> + 'a;

/// A growable collection filled by a multi-row select.
pub trait RecordList {
    /// The select statement for the list, with an optional trailing clause
    fn sql_get(&self, extra: &str) -> String;

    /// Make room for one more record, let `decode` fill its receivers, and
    /// keep it.
    fn sql_results(&mut self, decode: &mut Decoder<'_>) -> Result<()>;
}

impl<T: Record + Default> RecordList for Vec<T> {
    fn sql_get(&self, extra: &str) -> String {
        let template = T::default();
        query::list_query(template.select_fields(), template.table_name(), extra)
    }

    fn sql_results(&mut self, decode: &mut Decoder<'_>) -> Result<()> {
        let mut add = T::default();
        decode(add.receivers().as_mut_slice())?;
        self.push(add);
        Ok(())
    }
}

/// Attach the positional receiver summary to a decode failure.
pub(crate) fn with_receivers(err: RqlError, receivers: &[&mut dyn Receiver]) -> RqlError {
    match err {
        RqlError::Decode { message, .. } => RqlError::Decode {
            message,
            receivers: describe(receivers),
        },
        other => other,
    }
}
