use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope CurseForge wraps every response in
#[derive(Deserialize, Debug)]
pub(crate) struct Response<T> {
    pub data: T,
}

/// Metadata for one uploaded file of a project
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    ///`0` when missing or null
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    ///Empty when missing or null, such records never match a server pack name
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default)]
    pub file_date: Option<String>,
    #[serde(default)]
    pub is_server_pack: Option<bool>,
    ///Id of the server pack that belongs to this (client) file
    #[serde(default)]
    pub server_pack_file_id: Option<u64>,
    #[serde(flatten)]
    pub _extra: HashMap<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FileRecord {
    pub fn is_server_pack(&self) -> bool {
        self.is_server_pack == Some(true)
    }

    /// The referenced server pack id, treating `0` the same as `null`
    pub fn server_pack_pointer(&self) -> Option<u64> {
        self.server_pack_file_id.filter(|id| *id != 0)
    }

    /// Milliseconds since the epoch, or `0` if the date is missing or unreadable
    pub fn timestamp(&self) -> i64 {
        self.file_date.as_deref().map_or(0, parse_timestamp)
    }
}

fn parse_timestamp(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.and_utc().timestamp_millis();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(0, |dt| dt.and_utc().timestamp_millis())
}

/// The server pack chosen to go into the launch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub file_name: String,
    pub server_version: String,
}
