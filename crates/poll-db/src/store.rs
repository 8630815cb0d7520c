//! The document store seam.
//!
//! Poll and vote logic only talks to a [`DocumentStore`]. [`crate::PollDb`]
//! is the libSQL-backed implementation; tests substitute their own.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::subscription::Subscription;

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Latest state of a single document, as delivered by a document subscription.
pub type DocumentSnapshot = Result<Option<Document>, StoreError>;

/// Every document of a collection, as delivered by a collection subscription.
pub type CollectionSnapshot = Result<Vec<Document>, StoreError>;

/// A stored document plus the timestamps the store maintains for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: String,
    pub id: String,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Incremented on every write to this document.
    pub revision: i64,
}

impl Document {
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }

    /// Decode the fields into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the fields do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(serde_json::Value::Object(
            self.fields.clone(),
        ))?)
    }
}

/// Encode a serializable value as document fields.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if `value` does not serialize to a
/// JSON object.
pub fn to_fields<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Query(format!(
            "document fields must be an object, got {other}"
        ))),
    }
}

/// Hierarchical document storage with live subscriptions.
///
/// Collection paths have an odd number of segments (`polls`,
/// `polls/{id}/votes`), document paths an even number (`polls/{id}`).
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Insert a document with a store-generated id, stamped with the
    /// current wall-clock time.
    fn create_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send {
        self.create_document_at(collection, fields, Utc::now())
    }

    /// Insert a document with a store-generated id. `created_at` becomes
    /// both its creation and update time.
    fn create_document_at(
        &self,
        collection: &str,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// Read a document. `Ok(None)` when it does not exist.
    fn get_document(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with `StoreError::NotFound` if the document does not exist.
    fn update_document(
        &self,
        path: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// Create or fully replace the document at `path`.
    fn set_document(
        &self,
        path: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// All documents of a collection, oldest first.
    fn list_collection(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Stream the document's current state, then every change to it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` for a malformed path.
    fn subscribe_document(&self, path: &str)
    -> Result<Subscription<DocumentSnapshot>, StoreError>;

    /// Stream the collection's current contents, then every change to it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` for a malformed path.
    fn subscribe_collection(
        &self,
        collection: &str,
    ) -> Result<Subscription<CollectionSnapshot>, StoreError>;
}
