//! Notification wording rules.
//!
//! Every domain event that alerts a user is turned into a [`Notice`] here.
//! Notices are point-in-time text snapshots: later changes to the ticket do
//! not rewrite notifications that were already sent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::request::{RequestPatch, RequestStatus};

/// Notification type tag stored in `notifications.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewRequest,
    NewMessage,
    RequestUpdate,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::NewRequest => "new_request",
            NotificationKind::NewMessage => "new_message",
            NotificationKind::RequestUpdate => "request_update",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_request" => Ok(NotificationKind::NewRequest),
            "new_message" => Ok(NotificationKind::NewMessage),
            "request_update" => Ok(NotificationKind::RequestUpdate),
            other => Err(CoreError::Validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Title and body of a notification, before a recipient is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }

    /// Sent to every admin when a homeowner files a ticket.
    pub fn new_request(request_type: &str, unit: Option<&str>) -> Self {
        let unit = unit.filter(|u| !u.is_empty()).unwrap_or("N/A");
        Self::new(
            NotificationKind::NewRequest,
            "New Maintenance Request",
            format!("New {request_type} request from unit {unit}"),
        )
    }

    /// Sent to the owner after an admin update.
    ///
    /// Exactly one notice per update call; the first matching rule wins:
    /// 1. status present -> wording for the new status;
    /// 2. a non-null technician assigned -> "Technician Assigned";
    /// 3. priority present -> "Priority Updated";
    /// 4. otherwise -> "Request Updated".
    pub fn request_updated(request_type: &str, patch: &RequestPatch) -> Self {
        let kind = NotificationKind::RequestUpdate;

        if let Some(status) = patch.status {
            return match status {
                RequestStatus::InProgress => Self::new(
                    kind,
                    "Request In Progress",
                    format!("Your {request_type} request is now being worked on"),
                ),
                RequestStatus::Completed => Self::new(
                    kind,
                    "Request Completed",
                    format!("Your {request_type} request has been completed"),
                ),
                RequestStatus::Pending => Self::new(
                    kind,
                    "Request Pending",
                    format!("Your {request_type} request is pending review"),
                ),
            };
        }

        if let Some(technician) = patch.technician_assigned() {
            return Self::new(
                kind,
                "Technician Assigned",
                format!("Technician {technician} assigned to your {request_type} request"),
            );
        }

        if let Some(priority) = patch.priority {
            return Self::new(
                kind,
                "Priority Updated",
                format!("Your {request_type} request priority changed to {priority}"),
            );
        }

        Self::new(
            kind,
            "Request Updated",
            format!("Your {request_type} request has been updated"),
        )
    }

    /// Sent to the owner when an admin posts on their ticket.
    pub fn admin_replied(request_type: &str) -> Self {
        Self::new(
            NotificationKind::NewMessage,
            "New Message",
            format!("Admin replied to your {request_type} request"),
        )
    }

    /// Sent to every admin when the owner posts on a ticket.
    pub fn homeowner_message(request_type: &str, request_id: &str) -> Self {
        Self::new(
            NotificationKind::NewMessage,
            "New Message from Homeowner",
            format!("New message on {request_type} request #{request_id}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Priority;

    #[test]
    fn new_request_names_type_and_unit() {
        let notice = Notice::new_request("Plumbing", Some("B5L12"));
        assert_eq!(notice.kind, NotificationKind::NewRequest);
        assert_eq!(notice.title, "New Maintenance Request");
        assert_eq!(notice.message, "New Plumbing request from unit B5L12");
    }

    #[test]
    fn new_request_without_unit_says_na() {
        assert!(Notice::new_request("Electrical", None).message.ends_with("unit N/A"));
        assert!(Notice::new_request("Electrical", Some("")).message.ends_with("unit N/A"));
    }

    #[test]
    fn completed_status_alone_yields_request_completed() {
        let patch = RequestPatch {
            status: Some(RequestStatus::Completed),
            ..Default::default()
        };
        let notice = Notice::request_updated("Plumbing", &patch);
        assert_eq!(notice.kind, NotificationKind::RequestUpdate);
        assert_eq!(notice.title, "Request Completed");
        assert_eq!(notice.message, "Your Plumbing request has been completed");
    }

    #[test]
    fn technician_alone_yields_technician_assigned() {
        let patch = RequestPatch {
            assigned_technician: Some(Some("X".into())),
            ..Default::default()
        };
        let notice = Notice::request_updated("Plumbing", &patch);
        assert_eq!(notice.title, "Technician Assigned");
        assert_eq!(notice.message, "Technician X assigned to your Plumbing request");
    }

    #[test]
    fn status_wins_over_technician() {
        let patch = RequestPatch {
            status: Some(RequestStatus::InProgress),
            assigned_technician: Some(Some("X".into())),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let notice = Notice::request_updated("Plumbing", &patch);
        assert_eq!(notice.title, "Request In Progress");
        assert_eq!(notice.message, "Your Plumbing request is now being worked on");
    }

    #[test]
    fn technician_wins_over_priority() {
        let patch = RequestPatch {
            assigned_technician: Some(Some("X".into())),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        assert_eq!(
            Notice::request_updated("Plumbing", &patch).title,
            "Technician Assigned"
        );
    }

    #[test]
    fn priority_alone_yields_priority_updated() {
        let patch = RequestPatch {
            priority: Some(Priority::High),
            ..Default::default()
        };
        let notice = Notice::request_updated("Security", &patch);
        assert_eq!(notice.title, "Priority Updated");
        assert_eq!(notice.message, "Your Security request priority changed to High");
    }

    #[test]
    fn pending_status_yields_request_pending() {
        let patch = RequestPatch {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        };
        assert_eq!(
            Notice::request_updated("General", &patch).message,
            "Your General request is pending review"
        );
    }

    #[test]
    fn notes_only_yield_generic_update() {
        let patch = RequestPatch {
            technician_notes: Some(Some("Parts ordered".into())),
            ..Default::default()
        };
        let notice = Notice::request_updated("Plumbing", &patch);
        assert_eq!(notice.title, "Request Updated");
        assert_eq!(notice.message, "Your Plumbing request has been updated");
    }

    #[test]
    fn clearing_technician_is_a_generic_update() {
        let patch = RequestPatch {
            assigned_technician: Some(None),
            ..Default::default()
        };
        assert_eq!(
            Notice::request_updated("Plumbing", &patch).title,
            "Request Updated"
        );
    }

    #[test]
    fn message_notices_address_the_other_party() {
        let to_owner = Notice::admin_replied("Plumbing");
        assert_eq!(to_owner.kind, NotificationKind::NewMessage);
        assert_eq!(to_owner.message, "Admin replied to your Plumbing request");

        let to_admins = Notice::homeowner_message("Plumbing", "REQ-1700000000000");
        assert_eq!(to_admins.title, "New Message from Homeowner");
        assert_eq!(
            to_admins.message,
            "New message on Plumbing request #REQ-1700000000000"
        );
    }

    #[test]
    fn kind_tags_match_storage_values() {
        for kind in [
            NotificationKind::NewRequest,
            NotificationKind::NewMessage,
            NotificationKind::RequestUpdate,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
    }
}
