pub mod auth;
pub mod messages;
pub mod notification;
pub mod requests;
