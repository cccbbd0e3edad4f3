// src/error.rs
use thiserror::Error;

/// Failures surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate key")]
    Duplicate,

    /// The backend timed out or the connection failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            // SQLSTATE 23505: unique_violation
            if db.code().as_deref() == Some("23505") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

/// Error taxonomy for poll commands. Every variant is terminal for the command
/// it came from; only `StoreUnavailable` is worth a caller-side retry.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("poll not found")]
    NotFound,

    #[error("option number out of range, valid options: 1-{max}")]
    InvalidOption { max: usize },

    #[error("voter has already voted in this poll")]
    AlreadyVoted,

    #[error("poll is no longer active")]
    PollClosed,

    #[error("caller is not the poll creator")]
    Forbidden,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for PollError {
    fn from(err: StoreError) -> Self {
        match err {
            // The uniqueness index on (poll_id, voter_id) is the authoritative
            // one-vote guard; a constraint hit is a duplicate ballot, not an
            // internal failure.
            StoreError::Duplicate => PollError::AlreadyVoted,
            StoreError::Unavailable(msg) => PollError::StoreUnavailable(msg),
        }
    }
}

impl PollError {
    /// Message rendered back into the chat channel.
    pub fn user_message(&self) -> String {
        match self {
            PollError::InvalidInput(msg) => msg.clone(),
            PollError::NotFound => "Poll not found".to_string(),
            PollError::InvalidOption { max } => {
                format!("Invalid option number. Valid options: 1-{max}")
            }
            PollError::AlreadyVoted => "You have already voted in this poll".to_string(),
            PollError::PollClosed => "This poll has ended".to_string(),
            PollError::Forbidden => "Only the poll creator can do that".to_string(),
            PollError::StoreUnavailable(_) => {
                "Poll storage is temporarily unavailable, please try again".to_string()
            }
        }
    }
}
