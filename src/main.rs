use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState, users::repo::PgUserRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| config.default_log_filter().to_string());
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

    tracing::info!(
        title = %config.title,
        version = %config.version,
        environment = %config.environment,
        debug = config.debug,
        "{}",
        config.description
    );

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let state = AppState::from_parts(config.clone(), Arc::new(PgUserRepo::new(db)));
    let app = app::build_app(state);
    app::serve(app, &config).await
}
