// src/poll.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::PollError;
use crate::ids;
use crate::models::{Poll, VoteRecord};
use crate::store::{PollStore, VoteStore};

/// Options used when a poll is created without any.
pub const DEFAULT_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Drives the poll state machine: `Active → Ended` (one-way) and
/// `{Active, Ended} → Deleted` (terminal). Stateless over an injected store
/// handle, so concurrent commands coordinate only through the store.
pub struct PollService<S> {
    store: Arc<S>,
}

impl<S> Clone for PollService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: PollStore + VoteStore> PollService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates an active poll. An empty option list falls back to
    /// [`DEFAULT_OPTIONS`]; option texts must be non-empty and pairwise
    /// distinct, since ballots store the chosen text.
    pub async fn create_poll(
        &self,
        creator_id: &str,
        question: &str,
        options: Vec<String>,
    ) -> Result<Poll, PollError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PollError::InvalidInput(
                "Poll question must not be empty".to_string(),
            ));
        }

        let options = if options.is_empty() {
            DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            options
        };
        if options.iter().any(|o| o.trim().is_empty()) {
            return Err(PollError::InvalidInput(
                "Poll options must not be empty".to_string(),
            ));
        }
        let distinct: HashSet<&str> = options.iter().map(String::as_str).collect();
        if distinct.len() != options.len() {
            return Err(PollError::InvalidInput(
                "Poll options must be distinct".to_string(),
            ));
        }

        let poll = Poll {
            id: ids::poll_id(),
            creator_id: creator_id.to_string(),
            question: question.to_string(),
            options,
            active: true,
            created_at: Utc::now(),
        };
        self.store.insert_poll(&poll).await?;
        info!(poll_id = %poll.id, "poll created");
        Ok(poll)
    }

    /// Records one ballot, returning the chosen option's display text.
    ///
    /// The `find_vote` pre-check is only the fast path; the store's uniqueness
    /// constraint on `(poll_id, voter_id)` is the authoritative guard, so a
    /// racing duplicate insert still comes back as `AlreadyVoted`.
    pub async fn cast_vote(
        &self,
        poll_id: &str,
        voter_id: &str,
        option_index: usize,
    ) -> Result<String, PollError> {
        let poll = self
            .store
            .get_poll(poll_id)
            .await?
            .ok_or(PollError::NotFound)?;
        if !poll.active {
            return Err(PollError::PollClosed);
        }

        // 1-based display index.
        if option_index < 1 || option_index > poll.options.len() {
            return Err(PollError::InvalidOption {
                max: poll.options.len(),
            });
        }
        let option = poll.options[option_index - 1].clone();

        if self.store.find_vote(poll_id, voter_id).await?.is_some() {
            return Err(PollError::AlreadyVoted);
        }

        let record = VoteRecord {
            id: ids::vote_record_id(poll_id, voter_id),
            poll_id: poll_id.to_string(),
            voter_id: voter_id.to_string(),
            option: option.clone(),
            voted_at: Utc::now(),
        };
        self.store.insert_vote(&record).await?;
        info!(poll_id, %option, "vote recorded");
        Ok(option)
    }

    /// Flips the poll to ended. Creator-only; idempotent, so ending an
    /// already-ended poll succeeds silently.
    pub async fn end_poll(&self, poll_id: &str, caller_id: &str) -> Result<(), PollError> {
        let poll = self
            .store
            .get_poll(poll_id)
            .await?
            .ok_or(PollError::NotFound)?;
        if poll.creator_id != caller_id {
            return Err(PollError::Forbidden);
        }
        self.store.set_poll_active(poll_id, false).await?;
        info!(poll_id, "poll ended");
        Ok(())
    }

    /// Removes the poll and every ballot cast for it. Creator-only.
    pub async fn delete_poll(&self, poll_id: &str, caller_id: &str) -> Result<(), PollError> {
        let poll = self
            .store
            .get_poll(poll_id)
            .await?
            .ok_or(PollError::NotFound)?;
        if poll.creator_id != caller_id {
            return Err(PollError::Forbidden);
        }
        self.store.delete_poll(poll_id).await?;
        info!(poll_id, "poll deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn service() -> (PollService<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (PollService::new(store.clone()), store)
    }

    fn opts(options: &[&str]) -> Vec<String> {
        options.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn create_preserves_option_order_and_starts_active() {
        let (svc, _) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi", "Salad"]))
            .await
            .unwrap();
        assert!(poll.active);
        assert_eq!(poll.options, opts(&["Pizza", "Sushi", "Salad"]));
        assert_eq!(poll.creator_id, "alice");
    }

    #[tokio::test]
    async fn create_without_options_defaults_to_yes_no() {
        let (svc, _) = service();
        let poll = svc.create_poll("alice", "Deploy today?", vec![]).await.unwrap();
        assert_eq!(poll.options, opts(&["Yes", "No"]));
    }

    #[tokio::test]
    async fn create_rejects_empty_question() {
        let (svc, _) = service();
        let err = svc.create_poll("alice", "   ", vec![]).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_options() {
        let (svc, _) = service();
        let err = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Pizza"]))
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn second_vote_by_same_voter_is_rejected() {
        let (svc, store) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi"]))
            .await
            .unwrap();

        assert_eq!(svc.cast_vote(&poll.id, "bob", 1).await.unwrap(), "Pizza");
        let err = svc.cast_vote(&poll.id, "bob", 2).await.unwrap_err();
        assert!(matches!(err, PollError::AlreadyVoted));

        // Exactly one stored ballot.
        assert_eq!(store.votes_for_poll(&poll.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_is_caught_by_the_store_constraint() {
        let (svc, store) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi"]))
            .await
            .unwrap();

        // Simulate a racing handler that slipped past the pre-check: the
        // ballot is already in the store when this vote lands.
        let record = VoteRecord {
            id: ids::vote_record_id(&poll.id, "bob"),
            poll_id: poll.id.clone(),
            voter_id: "bob".to_string(),
            option: "Pizza".to_string(),
            voted_at: Utc::now(),
        };
        store.insert_vote(&record).await.unwrap();

        let err = svc.cast_vote(&poll.id, "bob", 2).await.unwrap_err();
        assert!(matches!(err, PollError::AlreadyVoted));
    }

    #[tokio::test]
    async fn vote_with_out_of_range_index_fails() {
        let (svc, _) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi"]))
            .await
            .unwrap();

        let err = svc.cast_vote(&poll.id, "bob", 3).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidOption { max: 2 }));
        let err = svc.cast_vote(&poll.id, "bob", 0).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidOption { max: 2 }));
    }

    #[tokio::test]
    async fn vote_on_ended_poll_fails_closed() {
        let (svc, _) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi"]))
            .await
            .unwrap();
        svc.end_poll(&poll.id, "alice").await.unwrap();

        let err = svc.cast_vote(&poll.id, "bob", 1).await.unwrap_err();
        assert!(matches!(err, PollError::PollClosed));
    }

    #[tokio::test]
    async fn vote_on_missing_poll_fails_not_found() {
        let (svc, _) = service();
        let err = svc.cast_vote("nope", "bob", 1).await.unwrap_err();
        assert!(matches!(err, PollError::NotFound));
    }

    #[tokio::test]
    async fn end_is_idempotent_for_the_creator() {
        let (svc, store) = service();
        let poll = svc.create_poll("alice", "Lunch?", vec![]).await.unwrap();

        svc.end_poll(&poll.id, "alice").await.unwrap();
        svc.end_poll(&poll.id, "alice").await.unwrap();

        let stored = store.get_poll(&poll.id).await.unwrap().unwrap();
        assert!(!stored.active);
    }

    #[tokio::test]
    async fn end_and_delete_are_creator_only() {
        let (svc, store) = service();
        let poll = svc.create_poll("alice", "Lunch?", vec![]).await.unwrap();

        let err = svc.end_poll(&poll.id, "mallory").await.unwrap_err();
        assert!(matches!(err, PollError::Forbidden));
        let err = svc.delete_poll(&poll.id, "mallory").await.unwrap_err();
        assert!(matches!(err, PollError::Forbidden));

        // Poll state unchanged.
        let stored = store.get_poll(&poll.id).await.unwrap().unwrap();
        assert!(stored.active);
    }

    #[tokio::test]
    async fn delete_cascades_to_ballots() {
        let (svc, store) = service();
        let poll = svc
            .create_poll("alice", "Lunch?", opts(&["Pizza", "Sushi"]))
            .await
            .unwrap();
        svc.cast_vote(&poll.id, "bob", 1).await.unwrap();
        svc.cast_vote(&poll.id, "carol", 2).await.unwrap();

        svc.delete_poll(&poll.id, "alice").await.unwrap();

        assert!(store.get_poll(&poll.id).await.unwrap().is_none());
        assert!(store.votes_for_poll(&poll.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offline_store_surfaces_store_unavailable() {
        let (svc, store) = service();
        let poll = svc.create_poll("alice", "Lunch?", vec![]).await.unwrap();

        store.set_unavailable(true);
        let err = svc.cast_vote(&poll.id, "bob", 1).await.unwrap_err();
        assert!(matches!(err, PollError::StoreUnavailable(_)));
    }
}
