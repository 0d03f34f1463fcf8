use std::sync::Arc;

use tracing::{info, warn};

use super::dto::{LoginRequest, RegisterRequest};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::users::model::User;
use crate::users::repo::UserRepository;

/// Registration and login use-cases over the credential store.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Validates, hashes and persists a new user. Role defaults to `user`.
    pub async fn register(&self, payload: RegisterRequest) -> Result<User, AppError> {
        let username = payload.username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }
        if payload.password.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }

        let hash = hash_password(&payload.password)?;
        let role = payload.role.unwrap_or_default();

        let user = self.users.create(&username, &hash, role).await?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verifies credentials and mints a session token. Unknown username and
    /// wrong password fail identically so usernames cannot be enumerated.
    pub async fn login(&self, payload: LoginRequest) -> Result<String, AppError> {
        let username = payload.username.trim();

        let user = match self.users.find_by_username(username).await? {
            Some(u) => u,
            None => {
                warn!(username = %username, "login with unknown username");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(&payload.password, &user.password_hash)? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(&user)?;
        info!(user_id = %user.id, username = %user.username, "user logged in");
        Ok(token)
    }
}
