//! Maintenance request entity model and DTOs.

use caretrack_core::request::{LifecycleFields, Priority, RequestStatus};
use caretrack_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::message::Message;

/// A row from the `maintenance_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceRequest {
    pub id: String,
    /// The homeowner who filed the ticket. Never changes.
    pub user_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub request_type: String,
    pub description: String,
    pub unit: String,
    pub address: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub assigned_technician: Option<String>,
    pub technician_notes: Option<String>,
    pub completion_notes: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MaintenanceRequest {
    /// The fields the transition policy inspects.
    pub fn lifecycle(&self) -> LifecycleFields<'_> {
        LifecycleFields {
            status: self.status,
            assigned_technician: self.assigned_technician.as_deref(),
        }
    }
}

/// A ticket together with its chat log, oldest message first.
#[derive(Debug, Clone, Serialize)]
pub struct RequestWithMessages {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub messages: Vec<Message>,
}

/// Input for inserting a ticket. New tickets are always `pending` / `Medium`.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub id: String,
    pub user_id: DbId,
    pub request_type: String,
    pub description: String,
    pub unit: String,
    pub address: Option<String>,
}

/// Aggregate ticket counts across all owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct RequestStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}
