use std::sync::Arc;

use accounts_service::config::Config;
use accounts_service::domain::authentication::ports::AuthServicePort;
use accounts_service::domain::authentication::service::AuthService;
use accounts_service::inbound::http::router::create_router;
use accounts_service::outbound::repositories::InMemoryUserRepository;
use accounts_service::outbound::repositories::PostgresUserRepository;
use auth::CredentialService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accounts_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "accounts-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        "Configuration loaded"
    );

    let credential_config = config.jwt.resolve();
    tracing::info!(
        issuer = %credential_config.issuer,
        access_ttl_secs = credential_config.access_ttl.num_seconds(),
        refresh_ttl_secs = credential_config.refresh_ttl.num_seconds(),
        "Credential settings resolved"
    );
    let credentials = Arc::new(CredentialService::new(&credential_config));

    let auth_service: Arc<dyn AuthServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresUserRepository::new(pg_pool));
            Arc::new(AuthService::new(repository, credentials))
        }
        None => {
            tracing::warn!("No database URL configured, accounts are kept in memory");
            let repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(AuthService::new(repository, credentials))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service)).await?;

    tracing::info!("Server exited");
    Ok(())
}
