//! # poll-db
//!
//! Document storage and poll services for Livepoll.
//!
//! - [`PollDb`]: a libSQL-backed [`store::DocumentStore`] with live
//!   subscriptions. Writes made through this handle wake subscribers
//!   immediately; writes made by other processes are picked up by a
//!   periodic revision check.
//! - [`service::PollService`]: poll lifecycle (create, join, close, expire,
//!   sweep) and vote recording/tallying on top of any document store.
//! - [`expiry`]: countdown streams and the expiry watcher.

pub mod clock;
mod documents;
pub mod error;
pub mod expiry;
pub mod helpers;
mod live;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;
pub mod subscription;

#[cfg(test)]
mod test_support;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use error::StoreError;
use libsql::Builder;
use poll_config::StoreConfig;
use tokio::sync::broadcast;

/// Revision check period used by [`PollDb::open_local`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Capacity of the in-process change feed. Slow subscribers that fall
/// further behind than this simply re-read.
const CHANGE_FEED_CAPACITY: usize = 256;

/// A write observed through this handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreChange {
    pub collection: String,
    pub id: String,
}

struct Inner {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    changes: broadcast::Sender<StoreChange>,
    poll_interval: Duration,
}

/// libSQL-backed document store.
///
/// Cheap to clone; clones share the connection and the change feed, which
/// is what keeps a `:memory:` database visible to every subscriber.
#[derive(Clone)]
pub struct PollDb {
    inner: Arc<Inner>,
}

impl PollDb {
    /// Open a database at `path` (or `:memory:`) with the default revision
    /// check period.
    ///
    /// Runs migrations automatically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        Self::open_with_interval(path, DEFAULT_POLL_INTERVAL).await
    }

    /// Open the database described by the `[store]` config section,
    /// creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created, the database
    /// cannot be opened, or migrations fail.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let parent = Path::new(&config.path)
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let (false, Some(parent)) = (config.is_in_memory(), parent) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating store directory {}", parent.display()))?;
        }
        Self::open_with_interval(&config.path, config.poll_interval()).await
    }

    /// Open with an explicit revision check period.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_with_interval(
        path: &str,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Another process may hold the write lock briefly.
        conn.query("PRAGMA busy_timeout = 5000", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        let poll_db = Self {
            inner: Arc::new(Inner {
                db,
                conn,
                changes,
                poll_interval,
            }),
        };
        poll_db.run_migrations().await?;
        tracing::debug!(path, "document store opened");
        Ok(poll_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub fn conn(&self) -> &libsql::Connection {
        &self.inner.conn
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Generate a document id: 8 uppercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self) -> Result<String, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT upper(hex(randomblob(4)))", ())
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    pub(crate) fn publish(&self, collection: &str, id: &str) {
        // No receivers is fine: nobody is subscribed yet.
        let _ = self.inner.changes.send(StoreChange {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    pub(crate) fn changes(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.changes.subscribe()
    }
}

impl std::fmt::Debug for PollDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollDb")
            .field("poll_interval", &self.inner.poll_interval)
            .finish_non_exhaustive()
    }
}
