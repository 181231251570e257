//! Repository for the `maintenance_requests` table.

use caretrack_core::request::{RequestFilter, RequestPatch};
use sqlx::PgExecutor;

use crate::models::request::{CreateRequest, MaintenanceRequest, RequestStats};

/// Column list for `maintenance_requests` queries.
const COLUMNS: &str = "id, user_id, type, description, unit, address, priority, status, \
                       assigned_technician, technician_notes, completion_notes, completed_date, \
                       created_at, updated_at";

/// Provides CRUD and aggregate queries for maintenance tickets.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a new ticket with the column defaults for status and priority.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateRequest,
    ) -> Result<MaintenanceRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_requests (id, user_id, type, description, unit, address) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(&input.id)
            .bind(input.user_id)
            .bind(&input.request_type)
            .bind(&input.description)
            .bind(&input.unit)
            .bind(&input.address)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: &str,
    ) -> Result<Option<MaintenanceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_requests WHERE id = $1");
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Same as [`find_by_id`](Self::find_by_id) but takes a row lock.
    ///
    /// Concurrent updates of one ticket serialize on this lock, so each
    /// patch is checked against the state it actually replaces.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: &str,
    ) -> Result<Option<MaintenanceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Same as [`find_by_id`](Self::find_by_id) but blocks deletion of the
    /// row until the caller's transaction ends.
    ///
    /// A ticket deleted while the caller waited for the lock comes back as
    /// `None`.
    pub async fn find_by_id_for_share<'e>(
        executor: impl PgExecutor<'e>,
        id: &str,
    ) -> Result<Option<MaintenanceRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM maintenance_requests WHERE id = $1 FOR KEY SHARE");
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List tickets matching every set field of `filter`, newest first.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &RequestFilter,
    ) -> Result<Vec<MaintenanceRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_requests \
             WHERE ($1::BIGINT IS NULL OR user_id = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3::TEXT IS NULL OR type = $3) \
               AND ($4::TEXT IS NULL OR priority = $4) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(filter.owner_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.request_type.as_deref())
            .bind(filter.priority.map(|p| p.as_str()))
            .fetch_all(executor)
            .await
    }

    /// Apply a patch. Absent fields keep their value; present-null clears.
    ///
    /// Returns `None` if no ticket with the given `id` exists. Always
    /// refreshes `updated_at`.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: &str,
        patch: &RequestPatch,
    ) -> Result<Option<MaintenanceRequest>, sqlx::Error> {
        let (tech_set, tech) = split_nullable(&patch.assigned_technician);
        let (tech_notes_set, tech_notes) = split_nullable(&patch.technician_notes);
        let (completion_set, completion) = split_nullable(&patch.completion_notes);
        let (date_set, date) = match patch.completed_date {
            Some(v) => (true, v),
            None => (false, None),
        };

        let query = format!(
            "UPDATE maintenance_requests SET \
                priority = COALESCE($2, priority), \
                status = COALESCE($3, status), \
                assigned_technician = CASE WHEN $4 THEN $5 ELSE assigned_technician END, \
                technician_notes = CASE WHEN $6 THEN $7 ELSE technician_notes END, \
                completion_notes = CASE WHEN $8 THEN $9 ELSE completion_notes END, \
                completed_date = CASE WHEN $10 THEN $11 ELSE completed_date END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceRequest>(&query)
            .bind(id)
            .bind(patch.priority.map(|p| p.as_str()))
            .bind(patch.status.map(|s| s.as_str()))
            .bind(tech_set)
            .bind(tech)
            .bind(tech_notes_set)
            .bind(tech_notes)
            .bind(completion_set)
            .bind(completion)
            .bind(date_set)
            .bind(date)
            .fetch_optional(executor)
            .await
    }

    /// Delete a ticket row. Messages must be removed first.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ticket counts per status across every owner.
    pub async fn stats<'e>(executor: impl PgExecutor<'e>) -> Result<RequestStats, sqlx::Error> {
        sqlx::query_as::<_, RequestStats>(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress, \
                COUNT(*) FILTER (WHERE status = 'completed') AS completed \
             FROM maintenance_requests",
        )
        .fetch_one(executor)
        .await
    }
}

/// Split a tri-state patch field into `(provided, value)` bind parameters.
fn split_nullable(field: &Option<Option<String>>) -> (bool, Option<&str>) {
    match field {
        Some(v) => (true, v.as_deref()),
        None => (false, None),
    }
}
