//! Caretrack domain core.
//!
//! Pure domain logic shared by the persistence and HTTP layers. Nothing in
//! this crate performs I/O:
//!
//! - [`request`] -- ticket statuses, priorities, patches, and the transition policy.
//! - [`notice`] -- wording rules for every notification the system sends.
//! - [`access`] -- role and ownership predicates consulted before mutations.
//! - [`roles`] -- the two user roles.
//! - [`error`] -- the domain error taxonomy.

pub mod access;
pub mod error;
pub mod notice;
pub mod patch;
pub mod request;
pub mod roles;
pub mod types;
