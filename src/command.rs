// src/command.rs
//! Splits slash-command free text into typed per-verb arguments.
//!
//! Mattermost delivers the whole command line in `text`; the first token is
//! the trigger word itself and is skipped. The `/create` payload is JSON: a
//! quoted string for a question-only poll, or an array whose first element is
//! the question and the rest are options.

use serde_json::Value;

use crate::error::PollError;

pub const CREATE_USAGE: &str =
    r#"Usage: /create "Question" or /create ["Question", "Option 1", "Option 2"]"#;
pub const VOTE_USAGE: &str = "Usage: /vote <poll_id> <option_number>";

#[derive(Debug, PartialEq, Eq)]
pub struct CreateArgs {
    pub question: String,
    /// Empty when the payload was question-only; the lifecycle manager then
    /// falls back to the default yes/no pair.
    pub options: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct VoteArgs {
    pub poll_id: String,
    pub option_index: usize,
}

/// Drops the leading trigger token and returns the rest, if any.
fn args_after_trigger(text: &str) -> Option<&str> {
    let (_, rest) = text.trim().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn parse_create(text: &str) -> Result<CreateArgs, PollError> {
    let payload =
        args_after_trigger(text).ok_or_else(|| PollError::InvalidInput(CREATE_USAGE.to_string()))?;

    // A bare JSON string is a question-only poll.
    if let Ok(question) = serde_json::from_str::<String>(payload) {
        return Ok(CreateArgs {
            question,
            options: Vec::new(),
        });
    }

    let values: Vec<Value> = serde_json::from_str(payload)
        .map_err(|_| PollError::InvalidInput(CREATE_USAGE.to_string()))?;
    let mut items = values.iter();
    let question = items
        .next()
        .map(value_to_text)
        .ok_or_else(|| PollError::InvalidInput(CREATE_USAGE.to_string()))?;
    let options = items.map(value_to_text).collect();

    Ok(CreateArgs { question, options })
}

pub fn parse_vote(text: &str) -> Result<VoteArgs, PollError> {
    let rest =
        args_after_trigger(text).ok_or_else(|| PollError::InvalidInput(VOTE_USAGE.to_string()))?;
    let (poll_id, number) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| PollError::InvalidInput(VOTE_USAGE.to_string()))?;

    // Out-of-range is the lifecycle manager's call (it knows the option
    // count); a non-numeric argument is malformed input here.
    let option_index = number
        .trim()
        .parse::<usize>()
        .map_err(|_| PollError::InvalidInput(VOTE_USAGE.to_string()))?;

    Ok(VoteArgs {
        poll_id: poll_id.to_string(),
        option_index,
    })
}

/// Single poll-id argument, shared by `/results`, `/end` and `/delete`.
pub fn parse_poll_id(text: &str, usage: &str) -> Result<String, PollError> {
    args_after_trigger(text)
        .and_then(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .ok_or_else(|| PollError::InvalidInput(usage.to_string()))
}
