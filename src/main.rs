use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

mod app;
mod auth;
mod config;
mod error;
mod state;
mod tasks;
mod users;

use crate::config::{AppConfig, StorageKind};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "taskhub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);

    let state = match config.storage {
        StorageKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for postgres storage")?;
            let db = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(std::time::Duration::from_secs(10))
                .connect(url)
                .await
                .context("connect to database")?;

            if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                tracing::warn!(error = %e, "migration failed; continuing");
            }

            AppState::postgres(db, config.clone())
        }
        StorageKind::Memory => {
            tracing::info!("using in-memory storage");
            AppState::in_memory(config.clone())
        }
    };

    let app = app::build_app(state);
    app::serve(app, &config.addr()).await
}
