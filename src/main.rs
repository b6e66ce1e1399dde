use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vwash::{
    admin::repository::{InMemoryAdminRepository, PostgresAdminRepository},
    bootstrap::ensure_default_admin,
    build_router,
    catalog::repository::{InMemoryServiceRepository, PostgresServiceRepository},
    order::repository::{InMemoryOrderRepository, PostgresOrderRepository},
    user::repository::{InMemoryUserRepository, PostgresUserRepository},
    AppConfig, AppState, CredentialHasher, TokenConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vwash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(port = config.port, "Starting V-Wash laundry server");

    let token_config = TokenConfig::new(config.jwt_secret.clone(), config.token_expiration_days);
    let hasher = CredentialHasher::new();

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL and applied migrations");

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresOrderRepository::new(pool.clone())),
                Arc::new(PostgresServiceRepository::new(pool.clone())),
                Arc::new(PostgresAdminRepository::new(pool)),
                token_config,
                hasher,
            )
        }
        None => {
            warn!("DATABASE_URL not set, data will not survive a restart");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryOrderRepository::new()),
                Arc::new(InMemoryServiceRepository::new()),
                Arc::new(InMemoryAdminRepository::new()),
                token_config,
                hasher,
            )
        }
    };

    if let Err(e) = ensure_default_admin(&app_state, &config.admin).await {
        error!(error = %e, "Failed to create default admin");
        return Err(e.into());
    }

    let app = build_router(app_state, &config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
