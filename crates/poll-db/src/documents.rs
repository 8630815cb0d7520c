//! `DocumentStore` implementation for `PollDb`.

use chrono::{DateTime, Utc};

use crate::PollDb;
use crate::error::StoreError;
use crate::helpers::{check_collection_path, row_to_document, split_document_path};
use crate::live;
use crate::store::{CollectionSnapshot, Document, DocumentSnapshot, DocumentStore, Fields};
use crate::subscription::Subscription;

const DOCUMENT_COLUMNS: &str = "collection, id, fields, created_at, updated_at, revision";

/// Generated ids tried before giving up on an insert.
const ID_ATTEMPTS: u32 = 4;

impl PollDb {
    /// Current revision of a document, `None` if it does not exist.
    pub(crate) async fn document_revision(&self, path: &str) -> Result<Option<i64>, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut rows = self
            .conn()
            .query(
                "SELECT revision FROM documents WHERE collection = ?1 AND id = ?2",
                [collection, id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }

    /// Current revision of a collection, `None` if nothing was ever written
    /// to it.
    pub(crate) async fn collection_revision(
        &self,
        collection: &str,
    ) -> Result<Option<i64>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT revision FROM collection_revisions WHERE collection = ?1",
                [collection],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }

    /// Insert at a fresh key. `None` when `id` is already taken in
    /// `collection`; the existing document is left untouched.
    pub(crate) async fn insert_new(
        &self,
        collection: &str,
        id: &str,
        fields: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Document>, StoreError> {
        self.query_one(
            &format!(
                "INSERT INTO documents (collection, id, fields, created_at, updated_at, revision)
                 VALUES (?1, ?2, ?3, ?4, ?4, 1)
                 ON CONFLICT (collection, id) DO NOTHING
                 RETURNING {DOCUMENT_COLUMNS}"
            ),
            libsql::params![collection, id, fields, created_at.to_rfc3339()],
        )
        .await
    }

    async fn query_one(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<Document>, StoreError> {
        let mut rows = self.conn().query(sql, params).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }
}

impl DocumentStore for PollDb {
    async fn create_document_at(
        &self,
        collection: &str,
        fields: Fields,
        created_at: DateTime<Utc>,
    ) -> Result<Document, StoreError> {
        check_collection_path(collection)?;
        let fields = serde_json::to_string(&fields)?;
        for attempt in 1..=ID_ATTEMPTS {
            let id = self.generate_id().await?;
            match self.insert_new(collection, &id, &fields, created_at).await? {
                Some(doc) => {
                    self.publish(collection, &id);
                    tracing::debug!(path = %doc.path(), "document created");
                    return Ok(doc);
                }
                None => tracing::debug!(collection, %id, attempt, "generated id already taken"),
            }
        }
        Err(StoreError::Query(format!(
            "no free document id in {collection} after {ID_ATTEMPTS} attempts"
        )))
    }

    async fn get_document(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let (collection, id) = split_document_path(path)?;
        self.query_one(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = ?1 AND id = ?2"),
            [collection, id],
        )
        .await
    }

    async fn update_document(&self, path: &str, fields: Fields) -> Result<Document, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let doc = self
            .query_one(
                &format!(
                    "UPDATE documents
                     SET fields = json_patch(fields, ?1), updated_at = ?2, revision = revision + 1
                     WHERE collection = ?3 AND id = ?4
                     RETURNING {DOCUMENT_COLUMNS}"
                ),
                libsql::params![
                    serde_json::to_string(&fields)?,
                    Utc::now().to_rfc3339(),
                    collection,
                    id
                ],
            )
            .await?
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })?;
        self.publish(collection, id);
        tracing::debug!(path, revision = doc.revision, "document updated");
        Ok(doc)
    }

    async fn set_document(&self, path: &str, fields: Fields) -> Result<Document, StoreError> {
        let (collection, id) = split_document_path(path)?;
        let doc = self
            .query_one(
                &format!(
                    "INSERT INTO documents (collection, id, fields, created_at, updated_at, revision)
                     VALUES (?1, ?2, ?3, ?4, ?4, 1)
                     ON CONFLICT(collection, id) DO UPDATE SET
                         fields = excluded.fields,
                         updated_at = excluded.updated_at,
                         revision = documents.revision + 1
                     RETURNING {DOCUMENT_COLUMNS}"
                ),
                libsql::params![
                    collection,
                    id,
                    serde_json::to_string(&fields)?,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?
            .ok_or(StoreError::NoResult)?;
        self.publish(collection, id);
        tracing::debug!(path, revision = doc.revision, "document set");
        Ok(doc)
    }

    async fn list_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        check_collection_path(collection)?;
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS} FROM documents
                     WHERE collection = ?1 ORDER BY created_at, id"
                ),
                [collection],
            )
            .await?;
        let mut docs = Vec::new();
        while let Some(row) = rows.next().await? {
            docs.push(row_to_document(&row)?);
        }
        Ok(docs)
    }

    fn subscribe_document(
        &self,
        path: &str,
    ) -> Result<Subscription<DocumentSnapshot>, StoreError> {
        split_document_path(path)?;
        Ok(live::watch_document(self.clone(), path.to_string()))
    }

    fn subscribe_collection(
        &self,
        collection: &str,
    ) -> Result<Subscription<CollectionSnapshot>, StoreError> {
        check_collection_path(collection)?;
        Ok(live::watch_collection(self.clone(), collection.to_string()))
    }
}
