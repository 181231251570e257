//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept any `PgExecutor` as the first argument: `&PgPool` for one-shot
//! calls, `&mut *tx` when several writes must commit together.

pub mod message_repo;
pub mod notification_repo;
pub mod request_repo;
pub mod user_repo;

pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use request_repo::RequestRepo;
pub use user_repo::UserRepo;
