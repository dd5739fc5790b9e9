mod app;
mod auth;
mod config;
mod db;
mod error;
mod metabolism;
mod plans;
mod profiles;
mod seed;
mod state;
mod status;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutriplan=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;
    db::run_migrations(&app_state.db).await;

    if app_state.config.seed_demo_data {
        match seed::seed_demo_data(&app_state.db).await {
            Ok(inserted) => tracing::info!(inserted, "demo data seeded"),
            Err(e) => tracing::warn!(error = ?e, "demo data seeding failed"),
        }
    }

    app::serve(app::build_app(app_state)).await
}
