use std::sync::Arc;

mod app;
mod config;
mod db;
mod error;
#[cfg(test)]
mod memory;
mod posts;
mod record;
mod state;
mod users;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await;

    let app_state = AppState::postgres(config, pool);
    let addr = app_state.config.listen_addr()?;

    app::serve(app::build_app(app_state), addr).await
}

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("userposts=debug,axum=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}
