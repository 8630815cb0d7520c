//! Row parsing and path helpers.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::store::{Document, Fields};

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 as written by the store and `SQLite`'s
/// `datetime('now')` format for rows written by hand.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

fn segments(path: &str) -> Result<Vec<&str>, StoreError> {
    if path.is_empty() {
        return Err(StoreError::invalid_path(path, "path is empty"));
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|part| part.trim().is_empty()) {
        return Err(StoreError::invalid_path(path, "empty path segment"));
    }
    Ok(parts)
}

/// Check that `path` names a collection (odd number of segments).
///
/// # Errors
///
/// Returns `StoreError::InvalidPath` otherwise.
pub fn check_collection_path(path: &str) -> Result<(), StoreError> {
    if segments(path)?.len() % 2 == 0 {
        return Err(StoreError::invalid_path(
            path,
            "collection paths have an odd number of segments",
        ));
    }
    Ok(())
}

/// Split a document path into `(collection, id)`.
///
/// # Errors
///
/// Returns `StoreError::InvalidPath` if the path does not have an even
/// number of non-empty segments.
pub fn split_document_path(path: &str) -> Result<(&str, &str), StoreError> {
    if segments(path)?.len() % 2 != 0 {
        return Err(StoreError::invalid_path(
            path,
            "document paths have an even number of segments",
        ));
    }
    path.rsplit_once('/')
        .ok_or_else(|| StoreError::invalid_path(path, "missing document id"))
}

/// Columns: collection, id, fields, created_at, updated_at, revision.
pub(crate) fn row_to_document(row: &libsql::Row) -> Result<Document, StoreError> {
    let fields: Fields = serde_json::from_str(&row.get::<String>(2)?)?;
    Ok(Document {
        collection: row.get::<String>(0)?,
        id: row.get::<String>(1)?,
        fields,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
        revision: row.get::<i64>(5)?,
    })
}
