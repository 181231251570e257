//! Push delivery: committed notifications reach event bus subscribers.

mod common;

use caretrack_api::engine::{messaging, requests};
use caretrack_core::notice::NotificationKind;
use caretrack_events::DomainEvent;
use sqlx::PgPool;
use tokio::sync::broadcast::error::TryRecvError;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fan_out_is_published_after_commit(pool: PgPool) {
    let owner = common::create_homeowner(&pool, "Dana Reyes").await;
    let admin_a = common::create_admin(&pool, "Lee Park").await;
    let admin_b = common::create_admin(&pool, "Max Hill").await;
    let state = common::test_state(pool);
    let mut rx = state.event_bus.subscribe();

    let ticket = requests::create_request(
        &state.pool,
        &state.event_bus,
        &state.request_ids,
        &owner.actor(),
        requests::NewTicket {
            request_type: "Plumbing".into(),
            description: "Leak".into(),
            unit: "B5L12".into(),
            address: None,
        },
    )
    .await
    .unwrap();

    let mut recipients = Vec::new();
    for _ in 0..2 {
        let event = rx.recv().await.unwrap();
        let DomainEvent::NotificationCreated { kind, title, .. } = &event;
        assert_eq!(*kind, NotificationKind::NewRequest);
        assert_eq!(title, "New Maintenance Request");
        recipients.push(event.recipient());
    }
    recipients.sort_unstable();
    assert_eq!(recipients, vec![admin_a.id(), admin_b.id()]);

    messaging::post_message(
        &state.pool,
        &state.event_bus,
        &admin_a.actor(),
        &ticket.id,
        "On it".into(),
    )
    .await
    .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.recipient(), owner.id());
    assert_matches::assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_mutation_publishes_nothing(pool: PgPool) {
    let owner = common::create_homeowner(&pool, "Dana Reyes").await;
    let stranger = common::create_homeowner(&pool, "Sam Ortiz").await;
    common::create_admin(&pool, "Lee Park").await;
    let state = common::test_state(pool);

    let ticket = requests::create_request(
        &state.pool,
        &state.event_bus,
        &state.request_ids,
        &owner.actor(),
        requests::NewTicket {
            request_type: "Plumbing".into(),
            description: "Leak".into(),
            unit: "B5L12".into(),
            address: None,
        },
    )
    .await
    .unwrap();

    let mut rx = state.event_bus.subscribe();
    let result = messaging::post_message(
        &state.pool,
        &state.event_bus,
        &stranger.actor(),
        &ticket.id,
        "Not mine".into(),
    )
    .await;

    assert!(result.is_err());
    assert_matches::assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
}
