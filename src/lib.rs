//! Mattermost slash-command poll bot: create a poll, one vote per user,
//! tallies, creator-only end/delete. Commands arrive over HTTP and all state
//! lives in the store, so any number of handler tasks can run concurrently.

pub mod command;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod memory;
pub mod models;
pub mod poll;
pub mod routes;
pub mod store;
pub mod tally;

use std::sync::Arc;

use poll::PollService;
use store::{PollStore, VoteStore};

/// Shared handler state: the lifecycle manager plus the raw store handle the
/// tally engine reads through.
pub struct AppState<S> {
    pub service: PollService<S>,
    pub store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: PollStore + VoteStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            service: PollService::new(store.clone()),
            store,
        }
    }
}
