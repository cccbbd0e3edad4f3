// src/tally.rs
use std::collections::HashMap;

use serde::Serialize;

use crate::error::PollError;
use crate::store::{PollStore, VoteStore};

#[derive(Debug, Serialize)]
pub struct OptionTally {
    pub option: String,
    pub count: u64,
    /// Floor of `count * 100 / total_votes`; 0 when no votes were cast.
    pub percent: u64,
}

#[derive(Debug, Serialize)]
pub struct PollResults {
    pub poll_id: String,
    pub question: String,
    pub active: bool,
    pub total_votes: u64,
    /// One entry per poll option, in the poll's original option order.
    pub tallies: Vec<OptionTally>,
}

/// Aggregates the ballots of a poll into per-option counts and percentages.
///
/// Read-only. Options with zero votes are still reported. A ballot whose
/// option text matches no current option is skipped rather than failing the
/// whole tally (options are immutable, so this should not happen).
pub async fn compute_results<S: PollStore + VoteStore>(
    store: &S,
    poll_id: &str,
) -> Result<PollResults, PollError> {
    let poll = store.get_poll(poll_id).await?.ok_or(PollError::NotFound)?;
    let records = store.votes_for_poll(poll_id).await?;

    let mut counts: HashMap<&str, u64> = poll.options.iter().map(|o| (o.as_str(), 0)).collect();
    for record in &records {
        if let Some(count) = counts.get_mut(record.option.as_str()) {
            *count += 1;
        }
    }
    let total_votes: u64 = counts.values().sum();

    let tallies = poll
        .options
        .iter()
        .map(|option| {
            let count = counts[option.as_str()];
            let percent = if total_votes > 0 {
                count * 100 / total_votes
            } else {
                0
            };
            OptionTally {
                option: option.clone(),
                count,
                percent,
            }
        })
        .collect();

    Ok(PollResults {
        poll_id: poll.id,
        question: poll.question,
        active: poll.active,
        total_votes,
        tallies,
    })
}
