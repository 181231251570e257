//! Caretrack event bus.
//!
//! In-process publish/subscribe hub used to push freshly created
//! notifications to live subscribers (the SSE stream in the API).
//!
//! - [`EventBus`] -- fan-out hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`] -- the events carried on the bus.

pub mod bus;

pub use bus::{DomainEvent, EventBus};
