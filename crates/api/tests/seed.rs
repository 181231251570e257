//! Demo data loader.

mod common;

use axum::http::StatusCode;
use caretrack_api::seed::{
    seed_demo_data, SeedOutcome, DEMO_ADMIN_EMAIL, DEMO_HOMEOWNER_EMAIL, DEMO_PASSWORD,
};
use caretrack_core::request::RequestStatus;
use caretrack_core::roles::Role;
use caretrack_db::repositories::{RequestRepo, UserRepo};
use common::{body_json, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_loads_demo_accounts_and_tickets(pool: PgPool) {
    let outcome = seed_demo_data(&pool).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded { users: 2, requests: 3 });

    let admins = UserRepo::list_ids_by_role(&pool, Role::Admin).await.unwrap();
    assert_eq!(admins.len(), 1);

    let completed = RequestRepo::find_by_id(&pool, "REQ-003").await.unwrap().unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(completed.assigned_technician.as_deref(), Some("Mike Johnson"));
    assert!(completed.completed_date.is_some());

    let pending = RequestRepo::find_by_id(&pool, "REQ-002").await.unwrap().unwrap();
    assert_eq!(pending.status, RequestStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_accounts_can_sign_in(pool: PgPool) {
    seed_demo_data(&pool).await.unwrap();
    let app = common::build_test_app(pool);

    let body = json!({ "email": DEMO_HOMEOWNER_EMAIL, "password": DEMO_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["data"]["token"].as_str().unwrap().to_string();

    let listed = body_json(get_auth(app.clone(), "/api/v1/requests", &token).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 3);

    let body = json!({ "email": DEMO_ADMIN_EMAIL, "password": DEMO_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(body_json(response).await["data"]["user"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_skips_populated_database(pool: PgPool) {
    common::create_homeowner(&pool, "Dana Reyes").await;

    assert_eq!(seed_demo_data(&pool).await.unwrap(), SeedOutcome::AlreadySeeded);
    assert!(RequestRepo::find_by_id(&pool, "REQ-001").await.unwrap().is_none());
}
