//! Test data factories for records, pages and instants.
//!
//! Each factory returns a valid value with sensible defaults; use the closure parameter
//! to override specific fields.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use crate::domain::entities::{
    page::PageResponse,
    user_record::{UserRecord, UserRecords},
};

/// Fixed "now" used across tests: 2024-02-01T00:00:00Z.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
}

/// Render an instant the way the admin API does.
pub fn login_at(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Create a test record with sensible defaults and no login date.
pub fn create_test_record(id: &str, overrides: impl FnOnce(&mut UserRecord)) -> UserRecord {
    let mut record = UserRecord {
        id: id.to_string(),
        name: Some(format!("user-{id}")),
        created_at: Some("2023-01-01T00:00:00.000Z".to_string()),
        updated_at: Some("2023-06-01T00:00:00.000Z".to_string()),
        last_login_date: None,
    };
    overrides(&mut record);
    record
}

/// Create a record that last logged in at `at`.
pub fn create_record_with_login(id: &str, at: DateTime<Utc>) -> UserRecord {
    create_test_record(id, |r| r.last_login_date = Some(login_at(at)))
}

pub fn records_of(records: impl IntoIterator<Item = UserRecord>) -> UserRecords {
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

/// Raw page body as the admin API returns it.
pub fn page_json(docs: Vec<Value>, pages: u32, total: u64) -> Value {
    json!({ "docs": docs, "pages": pages, "total": total, "limit": docs.len() })
}

/// A page holding bare `{ "_id": .. }` documents.
pub fn page_of_ids(ids: &[&str], pages: u32, total: u64) -> PageResponse {
    let docs = ids.iter().map(|id| json!({ "_id": id })).collect();
    PageResponse {
        docs,
        pages: Some(pages),
        total: Some(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user_record::parse_last_login;

    #[test]
    fn test_login_at_round_trips_through_parser() {
        let now = test_now();
        assert_eq!(parse_last_login(&login_at(now)).unwrap(), now);
    }

    #[test]
    fn test_create_test_record_overrides() {
        let record = create_test_record("u1", |r| r.name = None);
        assert_eq!(record.id, "u1");
        assert!(record.name.is_none());
        assert!(record.last_login_date.is_none());
    }
}
