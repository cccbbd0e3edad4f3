// src/store.rs
use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Poll, VoteRecord};

/// Keyed storage of poll records.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError>;

    async fn get_poll(&self, poll_id: &str) -> Result<Option<Poll>, StoreError>;

    async fn set_poll_active(&self, poll_id: &str, active: bool) -> Result<(), StoreError>;

    /// Deletes the poll and every ballot cast for it as one logical unit.
    /// Ballots go first (or inside the same transaction), so an interrupted
    /// delete can leave an orphaned poll but never orphaned ballots.
    async fn delete_poll(&self, poll_id: &str) -> Result<(), StoreError>;
}

/// Keyed storage of ballots, unique per `(poll_id, voter_id)`.
///
/// `insert_vote` must reject a duplicate pair with [`StoreError::Duplicate`]
/// even when two handlers race past the `find_vote` pre-check.
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), StoreError>;

    async fn find_vote(
        &self,
        poll_id: &str,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, StoreError>;

    async fn votes_for_poll(&self, poll_id: &str) -> Result<Vec<VoteRecord>, StoreError>;

    /// Bulk-removes every ballot for a poll, returning how many were deleted.
    async fn delete_votes_for_poll(&self, poll_id: &str) -> Result<u64, StoreError>;
}
