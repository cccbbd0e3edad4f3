// handlers.rs
use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::command;
use crate::error::PollError;
use crate::models::{MattermostAttachment, MattermostRequest, MattermostResponse};
use crate::store::{PollStore, VoteStore};
use crate::tally;
use crate::AppState;

/// Every command outcome, success or domain error, is an HTTP 200 with a
/// human-readable message; Mattermost shows non-200 replies as opaque
/// failures.
fn respond(result: Result<MattermostResponse, PollError>) -> Json<MattermostResponse> {
    match result {
        Ok(response) => Json(response),
        Err(err) => {
            if let PollError::StoreUnavailable(ref msg) = err {
                error!(error = %msg, "store unavailable");
            }
            Json(MattermostResponse::in_channel(err.user_message()))
        }
    }
}

/// `/create "Question"` or `/create ["Question", "Option 1", ...]`
pub async fn create_poll<S: PollStore + VoteStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<MattermostRequest>,
) -> Json<MattermostResponse> {
    respond(async {
        let args = command::parse_create(&req.text)?;
        let poll = state
            .service
            .create_poll(&req.user_id, &args.question, args.options)
            .await?;

        let attachments = poll
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| MattermostAttachment {
                text: format!("{}. {}", i + 1, option),
                color: "#00FF00".to_string(),
            })
            .collect();
        let text = format!(
            "Poll created!\n*Question:* {}\n*Poll ID:* {}\n*Options:*",
            poll.question, poll.id
        );
        Ok(MattermostResponse::in_channel(text).with_attachments(attachments))
    }
    .await)
}

/// `/vote <poll_id> <option_number>`
pub async fn submit_vote<S: PollStore + VoteStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<MattermostRequest>,
) -> Json<MattermostResponse> {
    respond(async {
        let args = command::parse_vote(&req.text)?;
        let option = state
            .service
            .cast_vote(&args.poll_id, &req.user_id, args.option_index)
            .await?;
        Ok(MattermostResponse::in_channel(format!(
            "Your vote for \"{option}\" has been counted"
        )))
    }
    .await)
}

/// `/results <poll_id>`
pub async fn get_results<S: PollStore + VoteStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<MattermostRequest>,
) -> Json<MattermostResponse> {
    respond(async {
        let poll_id = command::parse_poll_id(&req.text, "Usage: /results <poll_id>")?;
        let results = tally::compute_results(state.store.as_ref(), &poll_id).await?;

        let status = if results.active { "Active" } else { "Ended" };
        let mut text = format!(
            "*Poll results:* {}\n*Status:* {}\n*Total votes:* {}\n",
            results.question, status, results.total_votes
        );
        for (i, tally) in results.tallies.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. {}: {} votes ({}%)",
                i + 1,
                tally.option,
                tally.count,
                tally.percent
            ));
        }
        Ok(MattermostResponse::in_channel(text))
    }
    .await)
}

/// `/end <poll_id>`
pub async fn end_poll<S: PollStore + VoteStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<MattermostRequest>,
) -> Json<MattermostResponse> {
    respond(async {
        let poll_id = command::parse_poll_id(&req.text, "Usage: /end <poll_id>")?;
        state.service.end_poll(&poll_id, &req.user_id).await?;
        Ok(MattermostResponse::in_channel("Poll ended"))
    }
    .await)
}

/// `/delete <poll_id>`
pub async fn delete_poll<S: PollStore + VoteStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<MattermostRequest>,
) -> Json<MattermostResponse> {
    respond(async {
        let poll_id = command::parse_poll_id(&req.text, "Usage: /delete <poll_id>")?;
        state.service.delete_poll(&poll_id, &req.user_id).await?;
        Ok(MattermostResponse::in_channel("Poll deleted"))
    }
    .await)
}
