use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse};
use super::jwt::JwtKeys;
use super::service::AuthService;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.users.clone(), JwtKeys::from_ref(state))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = auth_service(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = auth_service(&state).login(payload).await?;
    Ok(Json(TokenResponse { token }))
}
