// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A poll: one question with a fixed, ordered set of options.
///
/// `options` is immutable after creation and its order is significant — a ballot
/// picks an option by 1-based position at vote time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poll {
    pub id: String,
    pub creator_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// One voter's single, immutable choice for one poll.
///
/// `id` is derived from `(poll_id, voter_id)`, so a second ballot for the same
/// pair collides in the store. `option` holds the display text copied at vote
/// time, not the index.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoteRecord {
    pub id: String,
    pub poll_id: String,
    pub voter_id: String,
    pub option: String,
    pub voted_at: DateTime<Utc>,
}

/// Slash-command payload as Mattermost posts it.
#[derive(Debug, Deserialize)]
pub struct MattermostRequest {
    #[serde(default)]
    pub text: String,
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Serialize)]
pub struct MattermostResponse {
    pub response_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MattermostAttachment>,
}

#[derive(Debug, Serialize)]
pub struct MattermostAttachment {
    pub text: String,
    pub color: String,
}

impl MattermostResponse {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: "in_channel".to_string(),
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<MattermostAttachment>) -> Self {
        self.attachments = attachments;
        self
    }
}
