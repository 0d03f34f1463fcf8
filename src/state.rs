use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{AppConfig, JwtConfig, StorageKind};
use crate::tasks::repo::{InMemoryTaskRepository, PgTaskRepository, TaskRepository};
use crate::users::repo::{InMemoryUserRepository, PgUserRepository, UserRepository};

/// Process-wide state, built once in `main` and injected everywhere.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn postgres(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            tasks: Arc::new(PgTaskRepository::new(db)),
            config,
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            config,
        }
    }

    /// In-memory state with a fixed signing secret, for tests.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            storage: StorageKind::Memory,
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_hours: 72,
            },
        });
        Self::in_memory(config)
    }
}
