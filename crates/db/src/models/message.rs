//! Message entity model and DTOs.

use caretrack_core::roles::Role;
use caretrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub request_id: String,
    /// Role of the author, not a specific user.
    #[sqlx(try_from = "String")]
    pub sender: Role,
    /// The acting user, when recorded.
    pub sender_user_id: Option<DbId>,
    pub message: String,
    pub created_at: Timestamp,
}

/// A message annotated with the display identity of its author.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
}

/// Input for appending a message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub request_id: String,
    pub sender: Role,
    pub sender_user_id: DbId,
    pub message: String,
}
