use dotenvy::dotenv;
use ncc_school::api::{self, AppState};
use ncc_school::config::auth::AuthConfig;
use ncc_school::config::server::ServerConfig;
use ncc_school::errors::Result;
use ncc_school::{config, core};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load server and auth configuration
    let server_config = ServerConfig::from_env()
        .inspect_err(|e| error!("Failed to load server configuration: {e}"))?;
    let auth_config = AuthConfig::from_env()
        .inspect_err(|e| error!("Failed to load auth configuration: {e}"))?;

    // 4. Initialize the database and ensure the schema exists
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ensured."))
        .inspect_err(|e| error!("Failed to create database schema: {e}"))?;

    // 5. Seed the initial API user, if configured
    core::user::seed_admin_from_env(&db)
        .await
        .inspect_err(|e| error!("Failed to seed admin user: {e}"))?;

    // 6. Serve the API
    let state = AppState {
        db,
        auth: auth_config,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    info!("Listening on {}", server_config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
