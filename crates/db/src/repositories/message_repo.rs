//! Repository for the `messages` table.

use sqlx::PgExecutor;

use crate::models::message::{CreateMessage, Message, MessageView};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, request_id, sender, sender_user_id, message, created_at";

/// Provides append and read access to ticket chat logs.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateMessage,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (request_id, sender, sender_user_id, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(&input.request_id)
            .bind(input.sender.as_str())
            .bind(input.sender_user_id)
            .bind(&input.message)
            .fetch_one(executor)
            .await
    }

    /// Messages of one ticket, oldest first.
    pub async fn list_for_request<'e>(
        executor: impl PgExecutor<'e>,
        request_id: &str,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE request_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(request_id)
            .fetch_all(executor)
            .await
    }

    /// Messages of several tickets in one round trip, oldest first per ticket.
    pub async fn list_for_requests<'e>(
        executor: impl PgExecutor<'e>,
        request_ids: &[String],
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE request_id = ANY($1) \
             ORDER BY request_id, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(request_ids)
            .fetch_all(executor)
            .await
    }

    /// Messages of one ticket with the author's display name and avatar.
    ///
    /// Homeowner messages resolve to the ticket owner. Admin messages resolve
    /// to the recorded sender, or to the lowest-id admin when none was kept.
    pub async fn list_views_for_request<'e>(
        executor: impl PgExecutor<'e>,
        request_id: &str,
    ) -> Result<Vec<MessageView>, sqlx::Error> {
        sqlx::query_as::<_, MessageView>(
            "SELECT m.id, m.request_id, m.sender, m.sender_user_id, m.message, m.created_at, \
                    u.name AS sender_name, u.profile_image AS sender_avatar \
             FROM messages m \
             JOIN maintenance_requests r ON r.id = m.request_id \
             LEFT JOIN LATERAL ( \
                 SELECT name, profile_image FROM users \
                 WHERE CASE \
                     WHEN m.sender = 'homeowner' THEN id = r.user_id \
                     WHEN m.sender_user_id IS NOT NULL THEN id = m.sender_user_id \
                     ELSE role = 'admin' \
                 END \
                 ORDER BY id ASC \
                 LIMIT 1 \
             ) u ON true \
             WHERE m.request_id = $1 \
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(request_id)
        .fetch_all(executor)
        .await
    }

    /// Remove every message of a ticket, returning how many were deleted.
    pub async fn delete_for_request<'e>(
        executor: impl PgExecutor<'e>,
        request_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE request_id = $1")
            .bind(request_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
