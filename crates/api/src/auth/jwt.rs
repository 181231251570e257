//! Bearer token issue and verification.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. There is no refresh flow; a
//! client logs in again once [`JwtConfig::expiry_hours`] have passed.

use caretrack_core::roles::Role;
use caretrack_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id.
    pub jti: String,
}

impl Claims {
    fn new(user_id: DbId, role: Role, lifetime: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user_id,
            role,
            exp: (issued + lifetime).timestamp(),
            iat: issued.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Seven days.
    pub const DEFAULT_EXPIRY_HOURS: i64 = 168;

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign a token for `user_id` valid for the configured number of hours.
pub fn generate_access_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, role, Duration::hours(config.expiry_hours));
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
}

/// Check signature and expiry, then return the claims.
///
/// A token whose `role` is not a known [`Role`] fails to decode.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &config.decoding_key(), &validation)
        .map(|data| data.claims)
}
