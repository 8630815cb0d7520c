//! Shared test utilities for poll-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use poll_core::identity::AuthIdentity;
    use poll_core::paths::POLLS_COLLECTION;

    use crate::PollDb;
    use crate::error::StoreError;
    use crate::service::{LifecycleSettings, PollService};
    use crate::store::{CollectionSnapshot, Document, DocumentSnapshot, DocumentStore, Fields};
    use crate::subscription::Subscription;

    /// In-memory service with default lifecycle settings.
    pub async fn test_service() -> PollService<PollDb> {
        service_with(LifecycleSettings::default()).await
    }

    pub async fn service_with(settings: LifecycleSettings) -> PollService<PollDb> {
        let db = PollDb::open_local(":memory:").await.unwrap();
        PollService::new(db, settings)
    }

    pub fn owner() -> AuthIdentity {
        AuthIdentity::new("user-owner")
    }

    pub fn stranger() -> AuthIdentity {
        AuthIdentity::new("user-stranger")
    }

    pub fn voter(n: u32) -> AuthIdentity {
        AuthIdentity::new(format!("user-voter-{n}"))
    }

    /// Write an active poll whose deadline passed five minutes ago,
    /// bypassing creation-time validation. Returns its id.
    pub async fn seed_expired_poll(svc: &PollService<PollDb>) -> String {
        let expires_at = Utc::now() - chrono::Duration::minutes(5);
        let fields = json!({
            "question": "Lunch?",
            "options": ["Pizza", "Sushi"],
            "createdBy": owner().user_id,
            "expiresAt": expires_at,
            "isActive": true,
        });
        svc.store()
            .create_document(POLLS_COLLECTION, fields.as_object().cloned().unwrap())
            .await
            .unwrap()
            .id
    }

    /// A store whose every call fails, as if the database were unreachable.
    #[derive(Debug, Clone, Default)]
    pub struct FailingStore;

    fn offline() -> StoreError {
        StoreError::Query("store offline".to_string())
    }

    impl DocumentStore for FailingStore {
        async fn create_document_at(
            &self,
            _: &str,
            _: Fields,
            _: DateTime<Utc>,
        ) -> Result<Document, StoreError> {
            Err(offline())
        }

        async fn get_document(&self, _: &str) -> Result<Option<Document>, StoreError> {
            Err(offline())
        }

        async fn update_document(&self, _: &str, _: Fields) -> Result<Document, StoreError> {
            Err(offline())
        }

        async fn set_document(&self, _: &str, _: Fields) -> Result<Document, StoreError> {
            Err(offline())
        }

        async fn list_collection(&self, _: &str) -> Result<Vec<Document>, StoreError> {
            Err(offline())
        }

        fn subscribe_document(
            &self,
            _: &str,
        ) -> Result<Subscription<DocumentSnapshot>, StoreError> {
            Err(offline())
        }

        fn subscribe_collection(
            &self,
            _: &str,
        ) -> Result<Subscription<CollectionSnapshot>, StoreError> {
            Err(offline())
        }
    }

    pub fn failing_service() -> PollService<FailingStore> {
        PollService::new(FailingStore, LifecycleSettings::default())
    }
}
