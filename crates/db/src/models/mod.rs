//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize`-free input structs the repositories bind from

pub mod message;
pub mod notification;
pub mod request;
pub mod user;
