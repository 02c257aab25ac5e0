pub mod csv_batch;
pub mod csv_reader;
pub mod error;
pub mod parse;

// Re-export commonly used types
pub use csv_batch::{read_records, write_records};
pub use csv_reader::CsvRecordStream;
pub use error::IoError;
pub use parse::RawRecord;
