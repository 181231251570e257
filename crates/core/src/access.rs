//! Access-control gate.
//!
//! Stateless role and ownership predicates consulted before every read or
//! mutation. Callers look the resource up first (so unknown ids surface as
//! `NotFound`) and only then ask the gate, turning a `false` into
//! `Forbidden` with [`ensure`].

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub const fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    fn owns(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id
    }
}

/// Only homeowners file tickets.
pub fn can_create_request(actor: &Actor) -> bool {
    actor.role == Role::Homeowner
}

/// Admins read every ticket; homeowners read their own.
pub fn can_read_request(actor: &Actor, owner_id: DbId) -> bool {
    actor.is_admin() || actor.owns(owner_id)
}

/// Lifecycle fields are admin-only.
pub fn can_mutate_request(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Admins delete any ticket; homeowners delete their own.
pub fn can_delete_request(actor: &Actor, owner_id: DbId) -> bool {
    actor.is_admin() || actor.owns(owner_id)
}

/// Admins post on any ticket; homeowners post on their own.
pub fn can_post_message(actor: &Actor, owner_id: DbId) -> bool {
    actor.is_admin() || actor.owns(owner_id)
}

/// Notifications are private to their recipient, admins included.
pub fn can_read_notification(actor: &Actor, recipient_id: DbId) -> bool {
    actor.owns(recipient_id)
}

pub fn can_mutate_notification(actor: &Actor, recipient_id: DbId) -> bool {
    actor.owns(recipient_id)
}

pub fn can_view_stats(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Turn a gate decision into `Forbidden`.
pub fn ensure(allowed: bool, reason: &str) -> Result<(), CoreError> {
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(reason.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: Actor = Actor::new(1, Role::Homeowner);
    const NEIGHBOUR: Actor = Actor::new(2, Role::Homeowner);
    const ADMIN: Actor = Actor::new(3, Role::Admin);

    #[test]
    fn only_homeowners_create_requests() {
        assert!(can_create_request(&OWNER));
        assert!(!can_create_request(&ADMIN));
    }

    #[test]
    fn request_reads_follow_ownership_or_admin() {
        assert!(can_read_request(&OWNER, 1));
        assert!(!can_read_request(&NEIGHBOUR, 1));
        assert!(can_read_request(&ADMIN, 1));
    }

    #[test]
    fn lifecycle_mutation_is_admin_only() {
        assert!(can_mutate_request(&ADMIN));
        assert!(!can_mutate_request(&OWNER));
    }

    #[test]
    fn deletion_allows_owner_and_admin() {
        assert!(can_delete_request(&OWNER, 1));
        assert!(can_delete_request(&ADMIN, 1));
        assert!(!can_delete_request(&NEIGHBOUR, 1));
    }

    #[test]
    fn messaging_allows_owner_and_admin() {
        assert!(can_post_message(&OWNER, 1));
        assert!(can_post_message(&ADMIN, 1));
        assert!(!can_post_message(&NEIGHBOUR, 1));
    }

    #[test]
    fn notifications_are_recipient_only() {
        assert!(can_read_notification(&OWNER, 1));
        assert!(can_mutate_notification(&OWNER, 1));
        assert!(!can_read_notification(&ADMIN, 1));
        assert!(!can_mutate_notification(&NEIGHBOUR, 1));
    }

    #[test]
    fn stats_are_admin_only() {
        assert!(can_view_stats(&ADMIN));
        assert!(!can_view_stats(&OWNER));
    }

    #[test]
    fn ensure_maps_denial_to_forbidden() {
        assert!(ensure(true, "nope").is_ok());
        assert_matches!(ensure(false, "nope"), Err(CoreError::Forbidden(msg)) if msg == "nope");
    }
}
