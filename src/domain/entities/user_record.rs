use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Wire format of `last_login_date`: UTC with a mandatory fractional-seconds part.
pub const LAST_LOGIN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Identity-keyed collection of discovered users.
pub type UserRecords = BTreeMap<String, UserRecord>;

/// The projection of a user document the counter keeps.
///
/// Field names on the wire follow the admin API (`_id`, `createdAt`, `last_login_date`),
/// and snapshots are written with the same names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        rename = "last_login_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("last login date {raw:?} does not match {}", LAST_LOGIN_FORMAT)]
pub struct DateParseError {
    pub raw: String,
}

/// What a record says about its owner's last login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSignal {
    Missing,
    Unparsable,
    At(DateTime<Utc>),
}

impl UserRecord {
    /// Project a raw API document onto the fields we keep.
    ///
    /// Returns `None` when the document has no usable identity (missing, empty or not a string).
    /// Optional fields that are present but not strings are treated as absent.
    pub fn project(raw: &Value) -> Option<Self> {
        let doc = raw.as_object()?;
        let id = doc.get("_id")?.as_str()?;
        if id.is_empty() {
            return None;
        }

        let text = |key: &str| doc.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            id: id.to_string(),
            name: text("name"),
            created_at: text("createdAt"),
            updated_at: text("updatedAt"),
            last_login_date: text("last_login_date"),
        })
    }

    pub fn login_signal(&self) -> LoginSignal {
        match self.last_login_date.as_deref() {
            None => LoginSignal::Missing,
            Some(raw) => match parse_last_login(raw) {
                Ok(at) => LoginSignal::At(at),
                Err(_) => LoginSignal::Unparsable,
            },
        }
    }
}

/// Parse a `last_login_date` value.
pub fn parse_last_login(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    // chrono treats the fraction as optional; the admin API always sends one.
    if !raw.contains('.') {
        return Err(DateParseError {
            raw: raw.to_string(),
        });
    }

    NaiveDateTime::parse_from_str(raw, LAST_LOGIN_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| DateParseError {
            raw: raw.to_string(),
        })
}

/// Insert or overwrite a record under its own identity.
pub fn upsert(records: &mut UserRecords, record: UserRecord) {
    records.insert(record.id.clone(), record);
}
