//! Notification dispatcher.
//!
//! Creates per-user notification rows in reaction to ticket and message
//! events, and owns the read/unread lifecycle. Creation helpers take a
//! connection so they join the caller's transaction; [`publish`] is called
//! once that transaction has committed.

use caretrack_core::access::{can_mutate_notification, can_read_notification, ensure, Actor};
use caretrack_core::error::CoreError;
use caretrack_core::notice::Notice;
use caretrack_core::roles::Role;
use caretrack_core::types::DbId;
use caretrack_db::models::notification::Notification;
use caretrack_db::repositories::{NotificationRepo, UserRepo};
use caretrack_db::DbPool;
use caretrack_events::{DomainEvent, EventBus};
use sqlx::PgConnection;

use crate::error::AppResult;

const ENTITY: &str = "Notification";

// ---------------------------------------------------------------------------
// Creation (inside a transaction)
// ---------------------------------------------------------------------------

/// Store one notice for one user.
pub async fn notify(
    conn: &mut PgConnection,
    user_id: DbId,
    notice: &Notice,
) -> AppResult<Notification> {
    let notification = NotificationRepo::create(&mut *conn, user_id, notice).await?;
    tracing::debug!(
        notification_id = notification.id,
        user_id,
        kind = notice.kind.as_str(),
        "Notification created",
    );
    Ok(notification)
}

/// Store the same notice once for every user holding `role`.
///
/// With no such users nothing is stored and an empty list is returned.
pub async fn notify_role(
    conn: &mut PgConnection,
    role: Role,
    notice: &Notice,
) -> AppResult<Vec<Notification>> {
    let recipients = UserRepo::list_ids_by_role(&mut *conn, role).await?;
    if recipients.is_empty() {
        tracing::warn!(%role, kind = notice.kind.as_str(), "No recipients for fan-out");
        return Ok(Vec::new());
    }
    let created = NotificationRepo::create_many(&mut *conn, &recipients, notice).await?;
    tracing::info!(
        %role,
        kind = notice.kind.as_str(),
        recipients = created.len(),
        "Notification fan-out",
    );
    Ok(created)
}

/// Announce committed notifications to live subscribers.
pub fn publish(bus: &EventBus, notifications: &[Notification]) {
    bus.publish_all(notifications.iter().map(to_event));
}

fn to_event(n: &Notification) -> DomainEvent {
    DomainEvent::NotificationCreated {
        notification_id: n.id,
        user_id: n.user_id,
        kind: n.kind,
        title: n.title.clone(),
        message: n.message.clone(),
        created_at: n.created_at,
    }
}

// ---------------------------------------------------------------------------
// Read / unread lifecycle
// ---------------------------------------------------------------------------

/// The actor's own notifications, newest first, optionally by read state.
pub async fn list_for_user(
    pool: &DbPool,
    actor: &Actor,
    is_read: Option<bool>,
) -> AppResult<Vec<Notification>> {
    Ok(NotificationRepo::list_for_user(pool, actor.user_id, is_read).await?)
}

pub async fn unread_count(pool: &DbPool, actor: &Actor) -> AppResult<i64> {
    Ok(NotificationRepo::unread_count(pool, actor.user_id).await?)
}

/// Mark one notification read.
///
/// Idempotent: an already-read notification is returned as it is.
pub async fn mark_read(pool: &DbPool, actor: &Actor, id: DbId) -> AppResult<Notification> {
    let existing = find_owned(pool, actor, id).await?;
    ensure(
        can_mutate_notification(actor, existing.user_id),
        "Not allowed to modify this notification",
    )?;
    if existing.is_read {
        return Ok(existing);
    }

    let updated = NotificationRepo::mark_read(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    tracing::info!(notification_id = id, user_id = actor.user_id, "Notification marked read");
    Ok(updated)
}

/// Mark every unread notification of the actor read, returning how many flipped.
pub async fn mark_all_read(pool: &DbPool, actor: &Actor) -> AppResult<u64> {
    let count = NotificationRepo::mark_all_read(pool, actor.user_id).await?;
    tracing::info!(user_id = actor.user_id, count, "All notifications marked read");
    Ok(count)
}

pub async fn delete(pool: &DbPool, actor: &Actor, id: DbId) -> AppResult<()> {
    let existing = find_owned(pool, actor, id).await?;
    ensure(
        can_mutate_notification(actor, existing.user_id),
        "Not allowed to delete this notification",
    )?;
    if !NotificationRepo::delete(pool, id).await? {
        return Err(CoreError::not_found(ENTITY, id).into());
    }
    tracing::info!(notification_id = id, user_id = actor.user_id, "Notification deleted");
    Ok(())
}

/// Fetch a notification the actor is allowed to see.
async fn find_owned(pool: &DbPool, actor: &Actor, id: DbId) -> AppResult<Notification> {
    let notification = NotificationRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    ensure(
        can_read_notification(actor, notification.user_id),
        "Not allowed to access this notification",
    )?;
    Ok(notification)
}
