// src/memory.rs
//! In-memory store double implementing the same contracts as [`crate::db::PgStore`].
//!
//! Backs the unit and integration tests; enforces the same `(poll_id, voter_id)`
//! uniqueness the Postgres index does.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{Poll, VoteRecord};
use crate::store::{PollStore, VoteStore};

#[derive(Default)]
pub struct MemoryStore {
    polls: Mutex<HashMap<String, Poll>>,
    votes: Mutex<HashMap<String, VoteRecord>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail, simulating a down backend.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        self.check_available()?;
        self.polls.lock().await.insert(poll.id.clone(), poll.clone());
        Ok(())
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Option<Poll>, StoreError> {
        self.check_available()?;
        Ok(self.polls.lock().await.get(poll_id).cloned())
    }

    async fn set_poll_active(&self, poll_id: &str, active: bool) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(poll) = self.polls.lock().await.get_mut(poll_id) {
            poll.active = active;
        }
        Ok(())
    }

    async fn delete_poll(&self, poll_id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        // Ballots first, matching the ordering guarantee of the real store.
        self.delete_votes_for_poll(poll_id).await?;
        self.polls.lock().await.remove(poll_id);
        Ok(())
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
        self.check_available()?;
        let mut votes = self.votes.lock().await;
        let duplicate = votes
            .values()
            .any(|v| v.poll_id == record.poll_id && v.voter_id == record.voter_id);
        if duplicate {
            return Err(StoreError::Duplicate);
        }
        votes.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_vote(
        &self,
        poll_id: &str,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .votes
            .lock()
            .await
            .values()
            .find(|v| v.poll_id == poll_id && v.voter_id == voter_id)
            .cloned())
    }

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<VoteRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .votes
            .lock()
            .await
            .values()
            .filter(|v| v.poll_id == poll_id)
            .cloned()
            .collect())
    }

    async fn delete_votes_for_poll(&self, poll_id: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut votes = self.votes.lock().await;
        let before = votes.len();
        votes.retain(|_, v| v.poll_id != poll_id);
        Ok((before - votes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ids;

    fn record(poll_id: &str, voter_id: &str, option: &str) -> VoteRecord {
        VoteRecord {
            id: ids::vote_record_id(poll_id, voter_id),
            poll_id: poll_id.to_string(),
            voter_id: voter_id.to_string(),
            option: option.to_string(),
            voted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_voter_rejected_at_store_level() {
        let store = MemoryStore::new();
        store.insert_vote(&record("p1", "alice", "Pizza")).await.unwrap();
        let err = store
            .insert_vote(&record("p1", "alice", "Sushi"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        // Same voter on a different poll is fine.
        store.insert_vote(&record("p2", "alice", "Pizza")).await.unwrap();
    }

    #[tokio::test]
    async fn bulk_delete_only_touches_one_poll() {
        let store = MemoryStore::new();
        store.insert_vote(&record("p1", "alice", "Pizza")).await.unwrap();
        store.insert_vote(&record("p1", "bob", "Sushi")).await.unwrap();
        store.insert_vote(&record("p2", "alice", "Pizza")).await.unwrap();

        assert_eq!(store.delete_votes_for_poll("p1").await.unwrap(), 2);
        assert!(store.votes_for_poll("p1").await.unwrap().is_empty());
        assert_eq!(store.votes_for_poll("p2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store.get_poll("p1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
