//! Vote repository: one upserted vote per voter, tallies, live tallies.

use futures::StreamExt;

use poll_core::entities::{Poll, Vote};
use poll_core::errors::PollError;
use poll_core::identity::AuthIdentity;
use poll_core::paths::{vote_path, votes_path};
use poll_core::tally::{Tally, tally};

use crate::repos::poll::poll_document_path;
use crate::service::PollService;
use crate::store::{Document, DocumentStore, Fields};
use crate::subscription::Subscription;

const CHOICE_FIELD: &str = "choice";

fn choice_of(doc: &Document) -> Option<&str> {
    doc.fields.get(CHOICE_FIELD).and_then(serde_json::Value::as_str)
}

fn vote_from_document(poll_id: &str, doc: &Document) -> Result<Vote, PollError> {
    let choice = choice_of(doc).ok_or_else(|| {
        PollError::StoreUnavailable(format!("vote {} has no choice", doc.path()))
    })?;
    Ok(Vote {
        poll_id: poll_id.to_string(),
        voter_id: doc.id.clone(),
        choice: choice.to_string(),
        voted_at: doc.updated_at,
    })
}

/// Tally a full snapshot of a votes collection.
pub(crate) fn tally_documents(options: &[String], docs: &[Document]) -> Tally {
    tally(options, docs.iter().filter_map(choice_of))
}

fn checked_voter_id(voter: &AuthIdentity) -> Result<&str, PollError> {
    let id = voter.user_id.as_str();
    if id.trim().is_empty() || id.contains('/') {
        return Err(PollError::Validation(format!("invalid voter id '{id}'")));
    }
    Ok(id)
}

impl<S: DocumentStore> PollService<S> {
    /// Record `voter`'s choice, replacing any earlier vote.
    pub async fn cast_vote(
        &self,
        voter: &AuthIdentity,
        poll_id: &str,
        choice: &str,
    ) -> Result<Vote, PollError> {
        let voter_id = checked_voter_id(voter)?;
        let poll = self.get_poll(poll_id).await?;
        if !poll.has_option(choice) {
            return Err(PollError::Validation(format!(
                "'{choice}' is not an option of this poll"
            )));
        }
        if self.settings().reject_late_votes && !poll.is_open_at(self.now()) {
            return Err(PollError::Validation("This poll is closed".to_string()));
        }

        let mut fields = Fields::new();
        fields.insert(CHOICE_FIELD.to_string(), choice.into());
        let doc = self
            .store()
            .set_document(&vote_path(&poll.id, voter_id), fields)
            .await?;

        tracing::info!(poll_id = %poll.id, voter = voter_id, revision = doc.revision, "vote recorded");
        vote_from_document(&poll.id, &doc)
    }

    /// The voter's current vote, if any.
    pub async fn my_vote(
        &self,
        voter: &AuthIdentity,
        poll_id: &str,
    ) -> Result<Option<Vote>, PollError> {
        poll_document_path(poll_id)?;
        let voter_id = checked_voter_id(voter)?;
        self.store()
            .get_document(&vote_path(poll_id, voter_id))
            .await?
            .map(|doc| vote_from_document(poll_id, &doc))
            .transpose()
    }

    /// Count the current votes of `poll_id` against `options`.
    pub async fn tally(&self, poll_id: &str, options: &[String]) -> Result<Tally, PollError> {
        poll_document_path(poll_id)?;
        let docs = self.store().list_collection(&votes_path(poll_id)).await?;
        Ok(tally_documents(options, &docs))
    }

    /// The poll together with its current tally.
    pub async fn poll_results(&self, poll_id: &str) -> Result<(Poll, Tally), PollError> {
        let poll = self.get_poll(poll_id).await?;
        let tally = self.tally(&poll.id, &poll.options).await?;
        Ok((poll, tally))
    }

    /// A fresh tally for every snapshot of the votes collection.
    pub fn observe_tally(
        &self,
        poll_id: &str,
        options: Vec<String>,
    ) -> Result<Subscription<Result<Tally, PollError>>, PollError> {
        poll_document_path(poll_id)?;
        let mut votes = self.store().subscribe_collection(&votes_path(poll_id))?;
        let poll_id = poll_id.to_string();
        Ok(Subscription::spawn(move |tx| async move {
            while let Some(snapshot) = votes.next().await {
                let item = snapshot
                    .map(|docs| tally_documents(&options, &docs))
                    .map_err(PollError::from);
                if let Ok(tally) = &item {
                    tracing::debug!(poll_id = %poll_id, total = tally.total_votes, "tally snapshot");
                }
                if tx.send(item).await.is_err() {
                    return;
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use poll_core::validation::NewPoll;

    use super::*;
    use crate::service::LifecycleSettings;
    use crate::test_support::helpers::{
        owner, seed_expired_poll, service_with, stranger, test_service, voter,
    };

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(ToString::to_string).collect()
    }

    async fn lunch(svc: &PollService<crate::PollDb>) -> Poll {
        svc.create_poll(&owner(), &NewPoll::new("Lunch?", ["Pizza", "Sushi"], 60))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn cast_vote_records_choice() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;

        let vote = svc.cast_vote(&voter(1), &poll.id, "Pizza").await.unwrap();
        assert_eq!(vote.poll_id, poll.id);
        assert_eq!(vote.voter_id, voter(1).user_id);
        assert_eq!(vote.choice, "Pizza");
        assert_eq!(svc.my_vote(&voter(1), &poll.id).await.unwrap(), Some(vote));
    }

    #[tokio::test]
    async fn second_vote_overwrites_first() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;

        svc.cast_vote(&voter(1), &poll.id, "Pizza").await.unwrap();
        svc.cast_vote(&voter(1), &poll.id, "Sushi").await.unwrap();

        let tally = svc.tally(&poll.id, &poll.options).await.unwrap();
        assert_eq!(tally.count_for("Pizza"), Some(0));
        assert_eq!(tally.count_for("Sushi"), Some(1));
        assert_eq!(tally.total_votes, 1);
        assert_eq!(
            svc.my_vote(&voter(1), &poll.id).await.unwrap().unwrap().choice,
            "Sushi"
        );
    }

    #[tokio::test]
    async fn vote_for_unknown_option_is_rejected() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;

        let err = svc.cast_vote(&voter(1), &poll.id, "pizza").await.unwrap_err();
        assert!(matches!(err, PollError::Validation(_)));
        assert_eq!(svc.my_vote(&voter(1), &poll.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn vote_on_unknown_poll_is_not_found() {
        let svc = test_service().await;
        let err = svc.cast_vote(&voter(1), "NOPE0000", "Pizza").await.unwrap_err();
        assert!(matches!(err, PollError::NotFound { .. }));
    }

    #[tokio::test]
    async fn late_votes_are_rejected_by_default() {
        let svc = test_service().await;
        let closed = lunch(&svc).await;
        svc.close_poll(&closed.id, &owner()).await.unwrap();
        let expired = seed_expired_poll(&svc).await;

        for poll_id in [closed.id.as_str(), expired.as_str()] {
            let err = svc.cast_vote(&voter(1), poll_id, "Pizza").await.unwrap_err();
            assert!(matches!(err, PollError::Validation(ref m) if m.contains("closed")));
        }
    }

    #[tokio::test]
    async fn late_votes_are_accepted_when_allowed() {
        let settings = LifecycleSettings {
            reject_late_votes: false,
            ..LifecycleSettings::default()
        };
        let svc = service_with(settings).await;
        let expired = seed_expired_poll(&svc).await;

        let vote = svc.cast_vote(&voter(1), &expired, "Pizza").await.unwrap();
        assert_eq!(vote.choice, "Pizza");
    }

    #[tokio::test]
    async fn tally_ignores_unknown_choices() {
        let svc = test_service().await;
        let poll_id = "AB12CD34";
        for (voter_id, choice) in [("u1", "A"), ("u2", "B"), ("u3", "A"), ("u4", "C")] {
            let mut fields = Fields::new();
            fields.insert(CHOICE_FIELD.into(), choice.into());
            svc.store()
                .set_document(&vote_path(poll_id, voter_id), fields)
                .await
                .unwrap();
        }

        let tally = svc.tally(poll_id, &options(&["A", "B"])).await.unwrap();
        assert_eq!(tally.count_for("A"), Some(2));
        assert_eq!(tally.count_for("B"), Some(1));
        assert_eq!(tally.count_for("C"), None);
        assert_eq!(tally.total_votes, 3);
    }

    #[tokio::test]
    async fn tally_of_poll_without_votes_is_all_zero() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;
        let (_, tally) = svc.poll_results(&poll.id).await.unwrap();
        assert_eq!(tally.total_votes, 0);
        assert!(tally.entries.iter().all(|entry| entry.count == 0));
    }

    #[tokio::test]
    async fn observe_tally_follows_votes() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;
        let mut live = svc.observe_tally(&poll.id, poll.options.clone()).unwrap();

        let initial = live.next().await.unwrap().unwrap();
        assert_eq!(initial.total_votes, 0);

        svc.cast_vote(&voter(1), &poll.id, "Pizza").await.unwrap();
        let after_one = tokio::time::timeout(Duration::from_secs(5), live.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(after_one.count_for("Pizza"), Some(1));

        svc.cast_vote(&stranger(), &poll.id, "Sushi").await.unwrap();
        let after_two = tokio::time::timeout(Duration::from_secs(5), live.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(after_two.total_votes, 2);
    }

    #[tokio::test]
    async fn invalid_voter_id_is_rejected() {
        let svc = test_service().await;
        let poll = lunch(&svc).await;
        let err = svc
            .cast_vote(&AuthIdentity::new("a/b"), &poll.id, "Pizza")
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Validation(_)));
    }
}
