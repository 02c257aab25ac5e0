use serde::{Deserialize, Serialize};

use super::error::IoError;
use crate::domain::Record;

/// Raw CSV row as read from input: `index,payload`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRecord {
    pub index: String,
    pub payload: Option<String>,
}

impl RawRecord {
    /// Parse this raw row into a routable record
    pub fn parse(self) -> Result<Record<String>, IoError> {
        let index = self
            .index
            .trim()
            .parse::<usize>()
            .map_err(|_| IoError::InvalidIndex(self.index.clone()))?;

        let payload = self
            .payload
            .ok_or_else(|| IoError::MissingField("payload".to_string()))?;

        Ok(Record::new(index, payload))
    }
}

impl From<&Record<String>> for RawRecord {
    fn from(record: &Record<String>) -> Self {
        Self {
            index: record.index.to_string(),
            payload: Some(record.payload.clone()),
        }
    }
}
