//! Poll repository: creation, lookup, close/expire, join, live view, sweep.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use poll_core::entities::{Poll, PollSummary};
use poll_core::enums::{CloseOutcome, PollStatus};
use poll_core::errors::PollError;
use poll_core::identity::AuthIdentity;
use poll_core::paths::{POLLS_COLLECTION, normalize_poll_code, poll_path};
use poll_core::validation::NewPoll;

use crate::service::PollService;
use crate::store::{Document, DocumentStore, Fields, to_fields};
use crate::subscription::Subscription;

/// Persisted shape of `polls/{id}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollFields {
    question: String,
    options: Vec<String>,
    created_by: String,
    expires_at: DateTime<Utc>,
    is_active: bool,
}

pub(crate) fn poll_from_document(doc: &Document) -> Result<Poll, PollError> {
    let fields: PollFields = doc.decode()?;
    Ok(Poll {
        id: doc.id.clone(),
        question: fields.question,
        options: fields.options,
        created_by: fields.created_by,
        created_at: doc.created_at,
        expires_at: fields.expires_at,
        is_active: fields.is_active,
    })
}

/// Document path for a poll id, treating ids that cannot name a document
/// as unknown polls.
pub(crate) fn poll_document_path(poll_id: &str) -> Result<String, PollError> {
    if poll_id.is_empty() || poll_id.contains('/') {
        return Err(PollError::poll_not_found(poll_id));
    }
    Ok(poll_path(poll_id))
}

fn inactive_fields() -> Fields {
    let mut fields = Fields::new();
    fields.insert("isActive".to_string(), serde_json::Value::Bool(false));
    fields
}

impl<S: DocumentStore> PollService<S> {
    /// Validate and persist a new active poll owned by `owner`.
    pub async fn create_poll(
        &self,
        owner: &AuthIdentity,
        request: &NewPoll,
    ) -> Result<Poll, PollError> {
        let validated = request.validate()?;
        let created_at = self.now();
        let expires_at = created_at + chrono::Duration::seconds(i64::from(validated.duration_secs));

        let fields = to_fields(&PollFields {
            question: validated.question,
            options: validated.options,
            created_by: owner.user_id.clone(),
            expires_at,
            is_active: true,
        })?;
        let doc = self
            .store()
            .create_document_at(POLLS_COLLECTION, fields, created_at)
            .await?;
        let poll = poll_from_document(&doc)?;

        tracing::info!(
            poll_id = %poll.id,
            owner = %owner.user_id,
            options = poll.options.len(),
            expires_at = %poll.expires_at,
            "poll created"
        );
        Ok(poll)
    }

    pub async fn get_poll(&self, poll_id: &str) -> Result<Poll, PollError> {
        let doc = self
            .store()
            .get_document(&poll_document_path(poll_id)?)
            .await?
            .ok_or_else(|| PollError::poll_not_found(poll_id))?;
        poll_from_document(&doc)
    }

    /// Owner-initiated close.
    ///
    /// An already-closed poll reports `AlreadyClosed` to anyone; only the
    /// owner may close an active one.
    pub async fn close_poll(
        &self,
        poll_id: &str,
        requester: &AuthIdentity,
    ) -> Result<CloseOutcome, PollError> {
        let poll = self.get_poll(poll_id).await?;
        if !poll.status().can_transition_to(PollStatus::Closed) {
            tracing::debug!(poll_id, "close requested on closed poll");
            return Ok(CloseOutcome::AlreadyClosed);
        }
        if !poll.is_owned_by(&requester.user_id) {
            return Err(PollError::Authorization(
                "only the poll creator can close this poll".to_string(),
            ));
        }

        self.store()
            .update_document(&poll_path(&poll.id), inactive_fields())
            .await?;
        tracing::info!(poll_id, by = %requester.user_id, "poll closed");
        Ok(CloseOutcome::Closed)
    }

    /// System close: no owner check, and only for an active poll whose
    /// deadline has passed. Returns whether this call closed it.
    pub async fn expire_poll(&self, poll_id: &str) -> Result<bool, PollError> {
        self.expire_poll_at(poll_id, self.now()).await
    }

    pub async fn expire_poll_at(
        &self,
        poll_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, PollError> {
        let poll = self.get_poll(poll_id).await?;
        if !poll.is_active || !poll.is_expired_at(now) {
            return Ok(false);
        }
        self.store()
            .update_document(&poll_path(&poll.id), inactive_fields())
            .await?;
        tracing::info!(poll_id, expires_at = %poll.expires_at, "poll expired");
        Ok(true)
    }

    /// Look up a poll by its public code.
    ///
    /// An active poll found past its deadline is reported inactive, and is
    /// closed on the spot when `close_on_join` is set.
    pub async fn join_poll(&self, code: &str) -> Result<PollSummary, PollError> {
        let poll_id = normalize_poll_code(code);
        if poll_id.is_empty() {
            return Err(PollError::Validation("Please enter a poll code".to_string()));
        }
        let poll = self.get_poll(&poll_id).await?;

        let now = self.now();
        let mut is_active = poll.is_active;
        if poll.is_active && poll.is_expired_at(now) {
            is_active = false;
            if self.settings().close_on_join {
                if let Err(err) = self.expire_poll_at(&poll.id, now).await {
                    tracing::warn!(poll_id = %poll.id, error = %err, "join-time close failed");
                }
            }
        }

        Ok(PollSummary {
            id: poll.id,
            question: poll.question,
            options: poll.options,
            is_active,
            expires_at: poll.expires_at,
        })
    }

    /// The poll as its owner sees it in the admin view.
    pub async fn admin_poll(
        &self,
        poll_id: &str,
        requester: &AuthIdentity,
    ) -> Result<Poll, PollError> {
        let poll = self.get_poll(poll_id).await?;
        if !poll.is_owned_by(&requester.user_id) {
            return Err(PollError::Authorization(
                "you are not the creator of this poll".to_string(),
            ));
        }
        Ok(poll)
    }

    /// Live poll snapshots. An absent document yields `NotFound`.
    pub fn observe_poll(
        &self,
        poll_id: &str,
    ) -> Result<Subscription<Result<Poll, PollError>>, PollError> {
        let mut upstream = self
            .store()
            .subscribe_document(&poll_document_path(poll_id)?)?;
        let poll_id = poll_id.to_string();
        Ok(Subscription::spawn(move |tx| async move {
            while let Some(snapshot) = upstream.next().await {
                let item = match snapshot {
                    Ok(Some(doc)) => poll_from_document(&doc),
                    Ok(None) => Err(PollError::poll_not_found(&poll_id)),
                    Err(err) => Err(err.into()),
                };
                tracing::debug!(poll_id = %poll_id, ok = item.is_ok(), "poll snapshot");
                if tx.send(item).await.is_err() {
                    return;
                }
            }
        }))
    }

    /// Close every active poll past its deadline as of `now`.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<Vec<String>, PollError> {
        let docs = self.store().list_collection(POLLS_COLLECTION).await?;
        let mut closed = Vec::new();
        for doc in &docs {
            let poll = match poll_from_document(doc) {
                Ok(poll) => poll,
                Err(err) => {
                    tracing::warn!(poll_id = %doc.id, error = %err, "skipping unreadable poll");
                    continue;
                }
            };
            if poll.is_active && poll.is_expired_at(now) && self.expire_poll_at(&poll.id, now).await? {
                closed.push(poll.id);
            }
        }
        if !closed.is_empty() {
            tracing::info!(count = closed.len(), "sweep closed expired polls");
        }
        Ok(closed)
    }

    pub async fn sweep_expired(&self) -> Result<Vec<String>, PollError> {
        self.sweep_expired_at(self.now()).await
    }

    /// Run [`Self::sweep_expired`] every `interval`, streaming each report.
    /// The first sweep runs immediately.
    pub fn spawn_sweeper(
        &self,
        interval: std::time::Duration,
    ) -> Subscription<Result<Vec<String>, PollError>> {
        let service = self.clone();
        Subscription::spawn(move |tx| async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = service.sweep_expired().await;
                if let Err(err) = &report {
                    tracing::warn!(error = %err, "sweep failed");
                }
                if tx.send(report).await.is_err() {
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::test_support::helpers::{
        failing_service, owner, seed_expired_poll, stranger, test_service,
    };

    fn lunch() -> NewPoll {
        NewPoll::new("Lunch?", ["Pizza", "Sushi"], 60)
    }

    #[tokio::test]
    async fn create_poll_persists_active_poll() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        assert_eq!(poll.id.len(), 8);
        assert!(poll.is_active);
        assert_eq!(poll.options, vec!["Pizza".to_string(), "Sushi".to_string()]);
        assert_eq!(poll.created_by, owner().user_id);
        let window = poll.expires_at - poll.created_at;
        assert!((window.num_seconds() - 60).abs() <= 1);

        assert_eq!(svc.get_poll(&poll.id).await.unwrap(), poll);
    }

    #[tokio::test(start_paused = true)]
    async fn create_poll_window_follows_injected_clock() {
        let svc = test_service()
            .await
            .with_clock(std::sync::Arc::new(crate::clock::RuntimeClock::new()));
        tokio::time::advance(std::time::Duration::from_secs(600)).await;

        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        assert_eq!(poll.expires_at - poll.created_at, chrono::Duration::seconds(60));
        let stored = svc.get_poll(&poll.id).await.unwrap();
        assert_eq!(stored.expires_at - stored.created_at, chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn create_poll_stores_camel_case_fields() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();
        let doc = svc
            .store()
            .get_document(&poll_path(&poll.id))
            .await
            .unwrap()
            .unwrap();
        let mut keys: Vec<&str> = doc.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["createdBy", "expiresAt", "isActive", "options", "question"]);
    }

    #[rstest]
    #[case(NewPoll::new("", ["A", "B"], 60))]
    #[case(NewPoll::new("Q?", ["onlyone"], 60))]
    #[case(NewPoll::new("Q?", ["A", "B"], 9))]
    #[case(NewPoll::new("Q?", ["A", "B"], 3601))]
    #[tokio::test]
    async fn create_poll_rejects_invalid_input(#[case] request: NewPoll) {
        let svc = test_service().await;
        let err = svc.create_poll(&owner(), &request).await.unwrap_err();
        assert!(matches!(err, PollError::Validation(_)), "got {err:?}");
        assert!(svc.store().list_collection(POLLS_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_unknown_poll_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_poll("NOPE0000").await.unwrap_err();
        assert!(matches!(err, PollError::NotFound { .. }));
        assert!(matches!(
            svc.get_poll("polls/x").await.unwrap_err(),
            PollError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        assert_eq!(svc.close_poll(&poll.id, &owner()).await.unwrap(), CloseOutcome::Closed);
        assert_eq!(
            svc.close_poll(&poll.id, &owner()).await.unwrap(),
            CloseOutcome::AlreadyClosed
        );
        assert!(!svc.get_poll(&poll.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn close_by_non_owner_is_rejected_and_leaves_poll_active() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        let err = svc.close_poll(&poll.id, &stranger()).await.unwrap_err();
        assert!(matches!(err, PollError::Authorization(_)));
        assert!(svc.get_poll(&poll.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn close_of_closed_poll_by_stranger_reports_already_closed() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();
        svc.close_poll(&poll.id, &owner()).await.unwrap();

        assert_eq!(
            svc.close_poll(&poll.id, &stranger()).await.unwrap(),
            CloseOutcome::AlreadyClosed
        );
    }

    #[tokio::test]
    async fn close_unknown_poll_is_not_found() {
        let svc = test_service().await;
        let err = svc.close_poll("NOPE0000", &owner()).await.unwrap_err();
        assert!(matches!(err, PollError::NotFound { .. }));
    }

    #[tokio::test]
    async fn expire_only_closes_active_expired_polls() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        assert!(!svc.expire_poll(&poll.id).await.unwrap());
        assert!(svc.get_poll(&poll.id).await.unwrap().is_active);

        let later = poll.expires_at + chrono::Duration::seconds(1);
        assert!(svc.expire_poll_at(&poll.id, later).await.unwrap());
        assert!(!svc.expire_poll_at(&poll.id, later).await.unwrap());
        assert!(!svc.get_poll(&poll.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn join_normalizes_code() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        let summary = svc
            .join_poll(&format!("  {}  ", poll.id.to_lowercase()))
            .await
            .unwrap();
        assert_eq!(
            summary,
            PollSummary {
                id: poll.id.clone(),
                question: "Lunch?".into(),
                options: poll.options.clone(),
                is_active: true,
                expires_at: poll.expires_at,
            }
        );
    }

    #[tokio::test]
    async fn join_unknown_code_is_not_found() {
        let svc = test_service().await;
        let err = svc.join_poll("ZZZZ0000").await.unwrap_err();
        assert!(matches!(err, PollError::NotFound { .. }));
        assert!(matches!(
            svc.join_poll("   ").await.unwrap_err(),
            PollError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn join_closes_expired_active_poll() {
        let svc = test_service().await;
        let id = seed_expired_poll(&svc).await;

        let summary = svc.join_poll(&id).await.unwrap();
        assert!(!summary.is_active);
        assert!(!svc.get_poll(&id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn join_without_close_on_join_reports_inactive_but_leaves_poll() {
        let mut settings = crate::service::LifecycleSettings::default();
        settings.close_on_join = false;
        let svc = PollService::new(svc_store().await, settings);
        let id = seed_expired_poll(&svc).await;

        assert!(!svc.join_poll(&id).await.unwrap().is_active);
        assert!(svc.get_poll(&id).await.unwrap().is_active);
    }

    async fn svc_store() -> crate::PollDb {
        crate::PollDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn admin_view_is_owner_only() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();

        assert_eq!(svc.admin_poll(&poll.id, &owner()).await.unwrap().id, poll.id);
        assert!(matches!(
            svc.admin_poll(&poll.id, &stranger()).await.unwrap_err(),
            PollError::Authorization(_)
        ));
    }

    #[tokio::test]
    async fn observe_poll_sees_close() {
        let svc = test_service().await;
        let poll = svc.create_poll(&owner(), &lunch()).await.unwrap();
        let mut sub = svc.observe_poll(&poll.id).unwrap();

        let first = sub.next().await.unwrap().unwrap();
        assert!(first.is_active);

        svc.close_poll(&poll.id, &owner()).await.unwrap();
        let second = sub.next().await.unwrap().unwrap();
        assert!(!second.is_active);
    }

    #[tokio::test]
    async fn observe_absent_poll_yields_not_found() {
        let svc = test_service().await;
        let mut sub = svc.observe_poll("NOPE0000").unwrap();
        let item = sub.next().await.unwrap();
        assert!(matches!(item, Err(PollError::NotFound { .. })));
    }

    #[tokio::test]
    async fn sweep_closes_only_expired_active_polls() {
        let svc = test_service().await;
        let fresh = svc.create_poll(&owner(), &lunch()).await.unwrap();
        let expired = seed_expired_poll(&svc).await;
        let already_closed = seed_expired_poll(&svc).await;
        svc.close_poll(&already_closed, &owner()).await.unwrap();

        let closed = svc.sweep_expired().await.unwrap();
        assert_eq!(closed, vec![expired.clone()]);
        assert!(svc.get_poll(&fresh.id).await.unwrap().is_active);
        assert!(!svc.get_poll(&expired).await.unwrap().is_active);

        assert!(svc.sweep_expired().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sweeper_streams_reports() {
        let svc = test_service().await;
        let expired = seed_expired_poll(&svc).await;

        let mut sweeper = svc.spawn_sweeper(std::time::Duration::from_millis(20));
        assert_eq!(sweeper.next().await.unwrap().unwrap(), vec![expired]);
        assert!(sweeper.next().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_unavailable() {
        let svc = failing_service();
        let err = svc.create_poll(&owner(), &lunch()).await.unwrap_err();
        assert!(matches!(err, PollError::StoreUnavailable(_)), "got {err:?}");

        let err = svc.get_poll("AB12CD34").await.unwrap_err();
        assert_eq!(err.kind(), "store_unavailable");
    }
}
