//! Ticket lifecycle engine.
//!
//! Create, list, read, patch, and delete maintenance tickets. Every entry
//! point consults the access gate first; mutations that notify someone run
//! in one transaction with the notification rows.

use std::collections::HashMap;

use caretrack_core::access::{
    can_create_request, can_delete_request, can_mutate_request, can_read_request, can_view_stats,
    ensure, Actor,
};
use caretrack_core::error::CoreError;
use caretrack_core::notice::Notice;
use caretrack_core::request::{RequestFilter, RequestIdGenerator, RequestPatch, TransitionPolicy};
use caretrack_core::roles::Role;
use caretrack_db::models::message::Message;
use caretrack_db::models::request::{
    CreateRequest, MaintenanceRequest, RequestStats, RequestWithMessages,
};
use caretrack_db::repositories::{MessageRepo, RequestRepo};
use caretrack_db::DbPool;
use caretrack_events::EventBus;

use super::dispatcher;
use crate::error::AppResult;

const ENTITY: &str = "MaintenanceRequest";

/// Fields a homeowner supplies when filing a ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub request_type: String,
    pub description: String,
    pub unit: String,
    pub address: Option<String>,
}

/// File a new ticket and alert every admin.
///
/// The ticket starts `pending` with `Medium` priority.
pub async fn create_request(
    pool: &DbPool,
    bus: &EventBus,
    ids: &RequestIdGenerator,
    actor: &Actor,
    ticket: NewTicket,
) -> AppResult<MaintenanceRequest> {
    ensure(
        can_create_request(actor),
        "Only homeowners can create maintenance requests",
    )?;

    let input = CreateRequest {
        id: ids.next_id(),
        user_id: actor.user_id,
        request_type: ticket.request_type,
        description: ticket.description,
        unit: ticket.unit,
        address: ticket.address,
    };

    let mut tx = pool.begin().await?;
    let request = RequestRepo::create(&mut *tx, &input).await?;
    let notice = Notice::new_request(&request.request_type, Some(request.unit.as_str()));
    let notifications = dispatcher::notify_role(&mut tx, Role::Admin, &notice).await?;
    tx.commit().await?;

    dispatcher::publish(bus, &notifications);
    tracing::info!(
        request_id = %request.id,
        user_id = actor.user_id,
        request_type = %request.request_type,
        "Maintenance request created",
    );
    Ok(request)
}

/// Tickets matching `filter`, newest first, each with its messages.
///
/// Homeowners only ever see their own tickets, whatever the filter says.
pub async fn list_requests(
    pool: &DbPool,
    actor: &Actor,
    filter: RequestFilter,
) -> AppResult<Vec<RequestWithMessages>> {
    let filter = if actor.is_admin() {
        RequestFilter {
            owner_id: None,
            ..filter
        }
    } else {
        filter.scoped_to_owner(actor.user_id)
    };

    let requests = RequestRepo::list(pool, &filter).await?;
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
    let mut by_request: HashMap<String, Vec<Message>> = HashMap::new();
    for message in MessageRepo::list_for_requests(pool, &ids).await? {
        by_request
            .entry(message.request_id.clone())
            .or_default()
            .push(message);
    }

    Ok(requests
        .into_iter()
        .map(|request| {
            let messages = by_request.remove(&request.id).unwrap_or_default();
            RequestWithMessages { request, messages }
        })
        .collect())
}

/// One ticket with its messages.
///
/// Unknown ids are `NotFound`; another owner's ticket is `Forbidden`.
pub async fn get_request(
    pool: &DbPool,
    actor: &Actor,
    id: &str,
) -> AppResult<RequestWithMessages> {
    let request = RequestRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    ensure(
        can_read_request(actor, request.user_id),
        "Not allowed to view this request",
    )?;

    let messages = MessageRepo::list_for_request(pool, id).await?;
    Ok(RequestWithMessages { request, messages })
}

/// Apply an admin patch and send the owner exactly one update notice.
///
/// Checks run in order: existence, role, transition policy, empty patch.
/// The row is locked for the duration so concurrent patches serialize.
pub async fn update_request(
    pool: &DbPool,
    bus: &EventBus,
    policy: TransitionPolicy,
    actor: &Actor,
    id: &str,
    patch: RequestPatch,
) -> AppResult<MaintenanceRequest> {
    let mut tx = pool.begin().await?;

    let current = RequestRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    ensure(
        can_mutate_request(actor),
        "Only admins can update maintenance requests",
    )?;
    policy.check(current.lifecycle(), &patch)?;
    if patch.is_empty() {
        return Err(CoreError::Validation("No fields to update".into()).into());
    }

    let updated = RequestRepo::update(&mut *tx, id, &patch)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    let notice = Notice::request_updated(&updated.request_type, &patch);
    let notification = dispatcher::notify(&mut tx, updated.user_id, &notice).await?;
    tx.commit().await?;

    dispatcher::publish(bus, std::slice::from_ref(&notification));
    tracing::info!(
        request_id = %updated.id,
        user_id = actor.user_id,
        status = %updated.status,
        notice = %notice.title,
        "Maintenance request updated",
    );
    Ok(updated)
}

/// Delete a ticket and its messages atomically.
///
/// Owners may delete their own tickets; admins may delete any.
pub async fn delete_request(pool: &DbPool, actor: &Actor, id: &str) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    ensure(
        can_delete_request(actor, request.user_id),
        "Not allowed to delete this request",
    )?;

    let removed_messages = MessageRepo::delete_for_request(&mut *tx, id).await?;
    if !RequestRepo::delete(&mut *tx, id).await? {
        return Err(CoreError::not_found(ENTITY, id).into());
    }
    tx.commit().await?;

    tracing::info!(
        request_id = %id,
        user_id = actor.user_id,
        removed_messages,
        "Maintenance request deleted",
    );
    Ok(())
}

/// Ticket counts per status. Admin only.
pub async fn get_stats(pool: &DbPool, actor: &Actor) -> AppResult<RequestStats> {
    ensure(can_view_stats(actor), "Only admins can view request statistics")?;
    Ok(RequestRepo::stats(pool).await?)
}
