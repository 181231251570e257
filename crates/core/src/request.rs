//! Maintenance request lifecycle rules.
//!
//! Defines the status and priority vocabularies, the partial-update patch an
//! admin submits, the transition policy that guards status changes, and the
//! `REQ-<unix-ms>` id generator.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::patch::deserialize_present;
use crate::types::DbId;

/// Every request id starts with this prefix.
pub const REQUEST_ID_PREFIX: &str = "REQ-";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";

/// Ticket status. `Pending` is initial, `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::InProgress => STATUS_IN_PROGRESS,
            RequestStatus::Completed => STATUS_COMPLETED,
        }
    }

    /// Statuses reachable from `self` under the strict state machine.
    ///
    /// - `pending`     -> `in-progress`
    /// - `in-progress` -> `completed`
    /// - `completed`   -> (none)
    pub fn successors(self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::Pending => &[RequestStatus::InProgress],
            RequestStatus::InProgress => &[RequestStatus::Completed],
            RequestStatus::Completed => &[],
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(RequestStatus::Pending),
            STATUS_IN_PROGRESS => Ok(RequestStatus::InProgress),
            STATUS_COMPLETED => Ok(RequestStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: \
                 {STATUS_PENDING}, {STATUS_IN_PROGRESS}, {STATUS_COMPLETED}"
            ))),
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Ticket priority. New tickets start at `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: High, Medium, Low"
            ))),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Admin patch over the lifecycle fields of a ticket.
///
/// An absent field means "no change". For the nullable fields an explicit
/// JSON `null` deserializes to `Some(None)` and clears the stored value.
/// Owner, type, description and unit are not patchable; unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestPatch {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub assigned_technician: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub technician_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub completion_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub completed_date: Option<Option<NaiveDate>>,
}

impl RequestPatch {
    /// `true` when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.priority.is_none()
            && self.status.is_none()
            && self.assigned_technician.is_none()
            && self.technician_notes.is_none()
            && self.completion_notes.is_none()
            && self.completed_date.is_none()
    }

    /// The technician name this patch assigns, if it assigns a non-null one.
    pub fn technician_assigned(&self) -> Option<&str> {
        self.assigned_technician.as_ref().and_then(|v| v.as_deref())
    }
}

/// Current lifecycle values of a stored ticket, as seen by the transition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleFields<'a> {
    pub status: RequestStatus,
    pub assigned_technician: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Transition policy
// ---------------------------------------------------------------------------

/// How strictly status writes are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status write by an admin is accepted.
    #[default]
    Permissive,
    /// The pending -> in-progress -> completed state machine is enforced.
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(CoreError::Validation(format!(
                "Invalid transition policy '{other}'. Must be 'permissive' or 'strict'"
            ))),
        }
    }
}

impl TransitionPolicy {
    /// Check `patch` against the stored ticket state.
    ///
    /// Under [`TransitionPolicy::Strict`]:
    /// - a status change must follow [`RequestStatus::successors`];
    /// - a ticket that ends up `in-progress` must have a technician, either
    ///   already stored or supplied by the same patch;
    /// - technician fields may not be set on a ticket that stays `pending`;
    /// - completion fields may only be set on a ticket that ends up `completed`.
    pub fn check(self, current: LifecycleFields<'_>, patch: &RequestPatch) -> Result<(), CoreError> {
        if self == TransitionPolicy::Permissive {
            return Ok(());
        }

        let next = patch.status.unwrap_or(current.status);
        if next != current.status && !current.status.successors().contains(&next) {
            return Err(CoreError::Validation(format!(
                "Cannot transition request from '{}' to '{}'",
                current.status, next
            )));
        }

        let technician = match &patch.assigned_technician {
            Some(value) => value.as_deref(),
            None => current.assigned_technician,
        };
        if next == RequestStatus::InProgress && technician.is_none() {
            return Err(CoreError::Validation(
                "A technician must be assigned before a request can be in progress".into(),
            ));
        }

        let sets_technician_fields = patch.technician_assigned().is_some()
            || matches!(patch.technician_notes, Some(Some(_)));
        if next == RequestStatus::Pending && sets_technician_fields {
            return Err(CoreError::Validation(
                "Technician fields can only be set once a request is in progress".into(),
            ));
        }

        let sets_completion_fields = matches!(patch.completion_notes, Some(Some(_)))
            || matches!(patch.completed_date, Some(Some(_)));
        if next != RequestStatus::Completed && sets_completion_fields {
            return Err(CoreError::Validation(
                "Completion fields can only be set on a completed request".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Optional conjunction of equality filters for ticket listings.
///
/// `owner_id` is never taken from the caller; the engine sets it for
/// homeowners via [`RequestFilter::scoped_to_owner`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub priority: Option<Priority>,
    #[serde(skip)]
    pub owner_id: Option<DbId>,
}

impl RequestFilter {
    pub fn scoped_to_owner(mut self, owner_id: DbId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Issues `REQ-<unix-ms>` ids that strictly increase within the process.
///
/// When two ids are requested within the same millisecond (or the clock
/// steps backwards) the generator hands out the last value plus one.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicI64,
}

impl RequestIdGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next id based on the current wall clock.
    pub fn next_id(&self) -> String {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_at(&self, now_ms: i64) -> String {
        let bump = |prev: i64| now_ms.max(prev + 1);
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| Some(bump(prev)))
            .unwrap_or_else(|prev| prev);
        format!("{REQUEST_ID_PREFIX}{}", bump(prev))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
