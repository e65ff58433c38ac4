//! The persisted form of a batch: JSON bytes addressed by a time-derived key.

use crate::types::batch::Batch;
use chrono::{DateTime, Utc};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A serialized batch ready to be written to object storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl StoredObject {
    pub fn from_batch(batch: &Batch, at: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            key: storage_key(at),
            body: batch.to_pretty_json()?,
            content_type: JSON_CONTENT_TYPE,
        })
    }
}

/// `<YYYY-MM-DD>/weather_<HHMMSS>.json` in UTC.
///
/// Resolution is one second: two uploads within the same second share a key, and the
/// later one replaces the earlier.
pub fn storage_key(at: DateTime<Utc>) -> String {
    format!(
        "{}/weather_{}.json",
        at.format("%Y-%m-%d"),
        at.format("%H%M%S")
    )
}
