/// Users, messages and notifications use PostgreSQL BIGSERIAL keys.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
