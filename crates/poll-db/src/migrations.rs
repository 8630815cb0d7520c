//! Schema migration runner.
//!
//! Migrations are embedded at compile time and use `IF NOT EXISTS`, so they
//! are re-run on every open.

use crate::PollDb;
use crate::error::StoreError;

const MIGRATION_001: &str = include_str!("../migrations/001_documents.sql");

impl PollDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_documents: {e}")))?;
        Ok(())
    }
}
