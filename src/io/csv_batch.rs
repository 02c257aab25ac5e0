use std::io::{Read, Write};

use csv::{ReaderBuilder, Trim, WriterBuilder};

use super::error::IoError;
use super::parse::RawRecord;
use crate::domain::Record;

/// Read a whole `index,payload` CSV document synchronously
///
/// Stops at the first malformed row. Use [`CsvRecordStream`](super::CsvRecordStream)
/// for per-row error handling.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record<String>>, IoError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .deserialize::<RawRecord>()
        .map(|row| row.map_err(IoError::from).and_then(RawRecord::parse))
        .collect()
}

/// Write records as an `index,payload` CSV document
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), IoError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record<String>>,
{
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    for record in records {
        csv_writer.serialize(RawRecord::from(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}
