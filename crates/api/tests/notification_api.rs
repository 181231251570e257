//! HTTP-level integration tests for the `/notifications` endpoints.

mod common;

use axum::http::StatusCode;
use caretrack_core::notice::Notice;
use caretrack_db::models::notification::Notification;
use caretrack_db::repositories::NotificationRepo;
use common::{body_json, delete_auth, get_auth, put_auth};
use sqlx::PgPool;

async fn seed(pool: &PgPool, user_id: i64, count: usize) -> Vec<Notification> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let notice = Notice::admin_replied(&format!("Job {i}"));
        created.push(NotificationRepo::create(pool, user_id, &notice).await.unwrap());
    }
    created
}

async fn unread(app: &axum::Router, token: &str) -> i64 {
    let json = body_json(get_auth(app.clone(), "/api/v1/notifications/unread/count", token).await).await;
    json["data"]["count"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_newest_first_and_scoped(pool: PgPool) {
    let dana = common::create_homeowner(&pool, "Dana Reyes").await;
    let sam = common::create_homeowner(&pool, "Sam Ortiz").await;
    seed(&pool, dana.id(), 3).await;
    seed(&pool, sam.id(), 1).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/v1/notifications", &dana.token).await).await;
    let listed = json["data"].as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0]["message"], "Admin replied to your Job 2 request");
    assert_eq!(listed[0]["type"], "new_message");
    assert!(listed.iter().all(|n| n["user_id"] == dana.id()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unread_count_and_mark_all_read(pool: PgPool) {
    let user = common::create_homeowner(&pool, "Dana Reyes").await;
    let other = common::create_homeowner(&pool, "Sam Ortiz").await;
    seed(&pool, user.id(), 4).await;
    seed(&pool, other.id(), 2).await;
    let app = common::build_test_app(pool);

    assert_eq!(unread(&app, &user.token).await, 4);

    let response = put_auth(app.clone(), "/api/v1/notifications/read-all", &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["marked_read"], 4);
    assert_eq!(unread(&app, &user.token).await, 0);

    // Idempotent, and other users are untouched.
    let again = body_json(put_auth(app.clone(), "/api/v1/notifications/read-all", &user.token).await).await;
    assert_eq!(again["data"]["marked_read"], 0);
    assert_eq!(unread(&app, &other.token).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_is_read_filter(pool: PgPool) {
    let user = common::create_homeowner(&pool, "Dana Reyes").await;
    let seeded = seed(&pool, user.id(), 3).await;
    NotificationRepo::mark_read(&pool, seeded[0].id).await.unwrap();
    let app = common::build_test_app(pool);

    let read = body_json(get_auth(app.clone(), "/api/v1/notifications?is_read=true", &user.token).await).await;
    assert_eq!(read["data"].as_array().unwrap().len(), 1);
    let unread = body_json(get_auth(app, "/api/v1/notifications?is_read=false", &user.token).await).await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_is_idempotent(pool: PgPool) {
    let user = common::create_homeowner(&pool, "Dana Reyes").await;
    let seeded = seed(&pool, user.id(), 2).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/notifications/{}/read", seeded[0].id);

    let first = put_auth(app.clone(), &uri, &user.token).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["data"]["is_read"], true);

    let second = put_auth(app.clone(), &uri, &user.token).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["data"]["is_read"], true);

    assert_eq!(unread(&app, &user.token).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_ownership_and_existence(pool: PgPool) {
    let owner = common::create_homeowner(&pool, "Dana Reyes").await;
    let admin = common::create_admin(&pool, "Lee Park").await;
    let seeded = seed(&pool, owner.id(), 1).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/notifications/{}/read", seeded[0].id);
    let foreign = put_auth(app.clone(), &uri, &admin.token).await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN, "admins cannot touch others' notifications");

    let missing = put_auth(app.clone(), "/api/v1/notifications/999999/read", &owner.token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    assert_eq!(unread(&app, &owner.token).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_notification(pool: PgPool) {
    let owner = common::create_homeowner(&pool, "Dana Reyes").await;
    let stranger = common::create_homeowner(&pool, "Sam Ortiz").await;
    let seeded = seed(&pool, owner.id(), 2).await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/notifications/{}", seeded[0].id);

    assert_eq!(delete_auth(app.clone(), &uri, &stranger.token).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete_auth(app.clone(), &uri, &owner.token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete_auth(app, &uri, &owner.token).await.status(), StatusCode::NOT_FOUND);

    assert!(NotificationRepo::find_by_id(&pool, seeded[0].id).await.unwrap().is_none());
    assert!(NotificationRepo::find_by_id(&pool, seeded[1].id).await.unwrap().is_some());
}
