use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::model::{Role, User};

/// JWT payload. Typed end to end; handlers receive this struct, never a
/// generic claim map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid, // user ID
    pub username: String,
    pub role: Role,
    pub iat: usize, // issued at (unix seconds)
    pub exp: usize, // expires at (unix seconds)
}

/// Holds the signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_hours } = state.config.jwt.clone();
        Self::new(&secret, ttl_hours)
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_hours as u64) * 3600),
        }
    }

    /// Mint a token for a user, expiring `ttl` after now (HS256).
    pub fn sign(&self, user: &User) -> Result<String, AppError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("jwt encode failed: {e}"))?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Validity is signature plus expiry, nothing else. Any failure collapses
    /// to the same `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("invalid or expired token"))?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn some_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "irrelevant".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let keys = JwtKeys::new("dev-secret", 72);
        let user = some_user(Role::Admin);
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expiry_is_72_hours_out() {
        let keys = JwtKeys::new("dev-secret", 72);
        let token = keys.sign(&some_user(Role::User)).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let keys = JwtKeys::new("secret-a", 72);
        let other = JwtKeys::new("secret-b", 72);
        let token = keys.sign(&some_user(Role::User)).expect("sign");
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn verify_rejects_expired_token() {
        // Encode claims that expired well past the validation leeway.
        let keys = JwtKeys::new("dev-secret", 72);
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".into(),
            role: Role::User,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = JwtKeys::new("dev-secret", 72);
        assert!(keys.verify("not.a.token").is_err());
    }
}
