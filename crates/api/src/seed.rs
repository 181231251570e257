//! Demo data for local development.
//!
//! One admin, one homeowner and three tickets in different lifecycle
//! states. Seeding is skipped when any user already exists.

use caretrack_core::request::{Priority, RequestPatch, RequestStatus};
use caretrack_core::roles::Role;
use caretrack_db::models::request::CreateRequest;
use caretrack_db::models::user::CreateUser;
use caretrack_db::repositories::{RequestRepo, UserRepo};
use caretrack_db::DbPool;
use chrono::NaiveDate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_ADMIN_EMAIL: &str = "admin@camella.com";
pub const DEMO_HOMEOWNER_EMAIL: &str = "homeowner@camella.com";

const ADDRESS: &str = "Block 5, Lot 12, Camella Homes";
const UNIT: &str = "Block 5 Lot 12";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { users: usize, requests: usize },
    AlreadySeeded,
}

struct DemoTicket {
    id: &'static str,
    request_type: &'static str,
    description: &'static str,
    patch: RequestPatch,
}

pub async fn seed_demo_data(pool: &DbPool) -> AppResult<SeedOutcome> {
    let existing: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users)")
        .fetch_one(pool)
        .await?;
    if existing {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let password_hash = hash_password(DEMO_PASSWORD)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = pool.begin().await?;
    UserRepo::create(
        &mut *tx,
        &CreateUser {
            email: DEMO_ADMIN_EMAIL.into(),
            password_hash: password_hash.clone(),
            name: "Juan Dela Cruz".into(),
            role: Role::Admin,
            phone: Some("+63 912 345 6789".into()),
            address: None,
            position: Some("Property Manager".into()),
            community: Some("Camella Homes".into()),
            profile_image: Some("https://api.dicebear.com/7.x/avataaars/png?seed=Juan".into()),
        },
    )
    .await?;
    let homeowner = UserRepo::create(
        &mut *tx,
        &CreateUser {
            email: DEMO_HOMEOWNER_EMAIL.into(),
            password_hash,
            name: "Maria Santos".into(),
            role: Role::Homeowner,
            phone: Some("+63 917 234 5678".into()),
            address: Some(ADDRESS.into()),
            position: None,
            community: None,
            profile_image: Some("https://api.dicebear.com/7.x/avataaars/png?seed=Maria".into()),
        },
    )
    .await?;

    let tickets = demo_tickets();
    for ticket in &tickets {
        let input = CreateRequest {
            id: ticket.id.into(),
            user_id: homeowner.id,
            request_type: ticket.request_type.into(),
            description: ticket.description.into(),
            unit: UNIT.into(),
            address: Some(ADDRESS.into()),
        };
        RequestRepo::create(&mut *tx, &input).await?;
        if !ticket.patch.is_empty() {
            RequestRepo::update(&mut *tx, ticket.id, &ticket.patch).await?;
        }
    }
    tx.commit().await?;

    tracing::info!(users = 2, requests = tickets.len(), "Demo data seeded");
    Ok(SeedOutcome::Seeded {
        users: 2,
        requests: tickets.len(),
    })
}

fn demo_tickets() -> Vec<DemoTicket> {
    vec![
        DemoTicket {
            id: "REQ-001",
            request_type: "Plumbing",
            description: "Leaking pipe in the kitchen sink",
            patch: RequestPatch {
                priority: Some(Priority::High),
                status: Some(RequestStatus::InProgress),
                assigned_technician: Some(Some("John Smith".into())),
                ..Default::default()
            },
        },
        DemoTicket {
            id: "REQ-002",
            request_type: "Electrical",
            description: "Flickering lights in living room",
            patch: RequestPatch::default(),
        },
        DemoTicket {
            id: "REQ-003",
            request_type: "HVAC",
            description: "Air conditioning not cooling properly",
            patch: RequestPatch {
                priority: Some(Priority::High),
                status: Some(RequestStatus::Completed),
                assigned_technician: Some(Some("Mike Johnson".into())),
                technician_notes: Some(Some("Replaced air filter and refrigerant".into())),
                completion_notes: Some(Some("AC is working efficiently now".into())),
                completed_date: Some(NaiveDate::from_ymd_opt(2024, 1, 15)),
            },
        },
    ]
}
