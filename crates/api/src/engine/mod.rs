//! Ticket engine.
//!
//! Implements the ticket lifecycle, per-ticket messaging, and the
//! notification dispatcher. Every mutation runs in one database
//! transaction together with the notifications it produces; the event bus
//! hears about those notifications only after the commit.

pub mod dispatcher;
pub mod messaging;
pub mod requests;
