use axum::extract::FromRef;
use dotenv::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod error;
mod follows;
mod likes;
mod policy;
mod posts;
mod query;
mod response;
mod routes;
#[cfg(test)]
mod testing;
mod toggle;
mod users;

use config::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    settings: Settings,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> PgPool {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Settings {
    fn from_ref(app_state: &AppState) -> Settings {
        app_state.settings.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chirp_backend=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    info!("database connected");

    db::MIGRATOR.run(&pool).await?;

    info!("migrations applied");

    let app = routes::router(AppState {
        pool,
        settings: settings.clone(),
    });

    info!("Server running on http://localhost:{}", settings.port);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
