use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::{Claims, JwtKeys};
use crate::error::AppError;

/// Bearer-token gate. Yields the decoded claims on success, 401 otherwise.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized("missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("invalid authorization header"))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!("invalid or expired token");
            e
        })?;

        Ok(AuthUser(claims))
    }
}

/// Admin tier: the bearer gate first, then the role check. 403 for a valid
/// non-admin token.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.is_admin() {
            warn!(user_id = %claims.sub, "admin route denied");
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::users::model::{Role, User};
    use axum::http::Request;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn parts_with_auth(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/tasks");
        if let Some(value) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token_for(state: &AppState, role: Role) -> String {
        let keys = JwtKeys::from_ref(state);
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "irrelevant".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        keys.sign(&user).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic abc"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let state = AppState::fake();
        let token = token_for(&state, Role::User);
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn token_signed_elsewhere_is_rejected() {
        let state = AppState::fake();
        let other_keys = JwtKeys::new("some-other-secret", 72);
        let user = User {
            id: Uuid::new_v4(),
            username: "mallory".into(),
            password_hash: "irrelevant".into(),
            role: Role::Admin,
            created_at: OffsetDateTime::now_utc(),
        };
        let token = other_keys.sign(&user).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admin_gate_rejects_plain_user_with_forbidden() {
        let state = AppState::fake();
        let token = token_for(&state, Role::User);
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn admin_gate_accepts_admin() {
        let state = AppState::fake();
        let token = token_for(&state, Role::Admin);
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AdminUser(claims) = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.role.is_admin());
    }
}
