use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use warden_api::{build_router, AppState};
use warden_infrastructure::{create_pool, pg_repositories, run_migrations};
use warden_security::JwtService;
use warden_shared::config::AppConfig;
use warden_shared::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = telemetry::init_telemetry(&config.log)?;

    info!("{} starting ({})", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    // Hook registry and shared services are built once here
    let state = AppState::new(
        pg_repositories(pool),
        JwtService::from_settings(&config.jwt),
        config.tenancy.clone(),
    );
    info!(root_domain = %config.tenancy.root_domain, "Tenancy configured");

    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
