//! Per-ticket messaging between the owner and the admin pool.

use caretrack_core::access::{can_post_message, can_read_request, ensure, Actor};
use caretrack_core::error::CoreError;
use caretrack_core::notice::Notice;
use caretrack_core::roles::Role;
use caretrack_db::models::message::{CreateMessage, Message, MessageView};
use caretrack_db::repositories::{MessageRepo, RequestRepo};
use caretrack_db::DbPool;
use caretrack_events::EventBus;

use super::dispatcher;
use crate::error::AppResult;

const ENTITY: &str = "MaintenanceRequest";

/// Append a message to a ticket and notify the other side.
///
/// An admin reply notifies the owner once. A homeowner message notifies
/// every admin, one row each.
pub async fn post_message(
    pool: &DbPool,
    bus: &EventBus,
    actor: &Actor,
    request_id: &str,
    text: String,
) -> AppResult<Message> {
    let mut tx = pool.begin().await?;

    // Held until commit so a concurrent delete cannot remove the ticket
    // between this check and the message insert.
    let request = RequestRepo::find_by_id_for_share(&mut *tx, request_id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, request_id))?;
    ensure(
        can_post_message(actor, request.user_id),
        "Not allowed to message on this request",
    )?;

    let input = CreateMessage {
        request_id: request.id.clone(),
        sender: actor.role,
        sender_user_id: actor.user_id,
        message: text,
    };
    let message = MessageRepo::create(&mut *tx, &input).await?;

    let notifications = match actor.role {
        Role::Admin => {
            let notice = Notice::admin_replied(&request.request_type);
            vec![dispatcher::notify(&mut tx, request.user_id, &notice).await?]
        }
        Role::Homeowner => {
            let notice = Notice::homeowner_message(&request.request_type, &request.id);
            dispatcher::notify_role(&mut tx, Role::Admin, &notice).await?
        }
    };
    tx.commit().await?;

    dispatcher::publish(bus, &notifications);
    tracing::info!(
        request_id = %request.id,
        message_id = message.id,
        sender = %actor.role,
        notified = notifications.len(),
        "Message posted",
    );
    Ok(message)
}

/// A ticket's messages, oldest first, with author display names and avatars.
pub async fn list_messages(
    pool: &DbPool,
    actor: &Actor,
    request_id: &str,
) -> AppResult<Vec<MessageView>> {
    let request = RequestRepo::find_by_id(pool, request_id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, request_id))?;
    ensure(
        can_read_request(actor, request.user_id),
        "Not allowed to view messages on this request",
    )?;

    Ok(MessageRepo::list_views_for_request(pool, request_id).await?)
}
