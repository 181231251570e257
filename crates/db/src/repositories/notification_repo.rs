//! Repository for the `notifications` table.

use caretrack_core::notice::Notice;
use caretrack_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, type, title, message, is_read, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create one unread notification for a user.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        notice: &Notice,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, type, title, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(notice.kind.as_str())
            .bind(&notice.title)
            .bind(&notice.message)
            .fetch_one(executor)
            .await
    }

    /// Create the same notice for every recipient in a single statement.
    ///
    /// Rows come back in recipient order. An empty slice inserts nothing.
    pub async fn create_many<'e>(
        executor: impl PgExecutor<'e>,
        user_ids: &[DbId],
        notice: &Notice,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, type, title, message) \
             SELECT recipient, $2, $3, $4 FROM UNNEST($1::BIGINT[]) AS recipient \
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, Notification>(&query)
            .bind(user_ids)
            .bind(notice.kind.as_str())
            .bind(&notice.title)
            .bind(&notice.message)
            .fetch_all(executor)
            .await?;
        rows.sort_by_key(|n| n.id);
        Ok(rows)
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `is_read` is set, only notifications with that read state are
    /// returned.
    pub async fn list_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR is_read = $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(is_read)
            .fetch_all(executor)
            .await
    }

    /// Mark a single notification as read, returning the updated row.
    ///
    /// Marking an already-read notification succeeds and changes nothing.
    pub async fn mark_read<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Mark all unread notifications for a user as read.
    ///
    /// Returns the number of notifications that changed state.
    pub async fn mark_all_read<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count unread notifications for a user.
    pub async fn unread_count<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
    }
}
