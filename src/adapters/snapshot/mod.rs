//! Save fetched records to a JSON file and load them back for offline analysis.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::entities::user_record::{UserRecords, upsert};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not a valid record file")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Write the records as a pretty-printed JSON object keyed by identity.
pub async fn save_records(path: &Path, records: &UserRecords) -> Result<(), SnapshotError> {
    let body = serde_json::to_vec_pretty(records).map_err(|source| SnapshotError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    tokio::fs::write(path, body)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), users = records.len(), "saved user records");
    Ok(())
}

/// Load records saved by `save_records`.
///
/// Entries are re-keyed by their own `_id`, so a hand-edited file whose keys disagree
/// with the records cannot break identity uniqueness.
pub async fn load_records(path: &Path) -> Result<UserRecords, SnapshotError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let stored: UserRecords =
        serde_json::from_slice(&body).map_err(|source| SnapshotError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records = UserRecords::new();
    for record in stored.into_values().filter(|r| !r.id.is_empty()) {
        upsert(&mut records, record);
    }

    info!(path = %path.display(), users = records.len(), "loaded user records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let records = records_of([
            create_record_with_login("u1", test_now()),
            create_test_record("u2", |r| r.name = None),
        ]);

        save_records(&path, &records).await.unwrap();
        let loaded = load_records(&path).await.unwrap();

        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_saved_file_uses_api_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let records = records_of([create_record_with_login("u1", test_now())]);

        save_records(&path, &records).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();

        assert_eq!(raw["u1"]["_id"], "u1");
        assert!(raw["u1"]["last_login_date"].is_string());
        assert!(raw["u1"]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_load_rekeys_by_record_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"{
                "stale-key": { "_id": "u1", "name": "first" },
                "other-key": { "_id": "u1", "name": "second" },
                "blank": { "_id": "" }
            }"#,
        )
        .unwrap();

        let loaded = load_records(&path).await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("u1"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "- not: json").unwrap();

        let err = load_records(&path).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Format { .. }));
    }
}
