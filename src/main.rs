//! TestLedger server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use testledger_lib::api::{self, ApiDoc};
use testledger_lib::config::Config;
use testledger_lib::db::DbPool;
use testledger_lib::middleware;
use testledger_lib::services::DeletionService;

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(std::io::Error::other)?;

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must be set and must not be the development default");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  TestLedger Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL");
    }

    let pool = DbPool::new(&config)
        .await
        .map_err(std::io::Error::other)?;
    info!("Database connection established");

    pool.run_migrations().await.map_err(std::io::Error::other)?;

    // Warm the schema catalog before the first deletion needs it.
    match pool.schema_catalog().await {
        Ok(catalog) => info!("Schema catalog ready ({} tables)", catalog.table_count()),
        Err(e) => warn!("Schema catalog not loaded yet: {}", e),
    }

    let deletion = DeletionService::from_config(&config).map_err(std::io::Error::other)?;
    info!(
        "Deletion order: {}",
        deletion
            .engine()
            .graph()
            .order()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let bind_address = config.bind_address();
    let worker_count = if config.is_development() {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let pool_data = web::Data::new(pool);
    let deletion_data = web::Data::new(deletion);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::RequestLogger)
            .app_data(pool_data.clone())
            .app_data(deletion_data.clone())
            .service(web::scope("/api/v1").configure(api::configure_api_routes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
