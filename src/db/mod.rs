//! Database module providing connection management, migrations, and per-entity queries.
//!
//! Repository functions are free functions generic over `ConnectionTrait` so the
//! same code runs against the pool or inside a caller-owned transaction.

pub mod assignments;
pub mod bugs;
pub mod catalog;
pub mod comments;
pub mod notifications;
pub mod projects;
pub mod raw;
pub mod reports;
pub mod requirements;
pub mod test_cases;
pub mod test_executions;
pub mod test_suites;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;
use crate::models::EntityKind;

pub use catalog::SchemaCatalog;

/// Largest number of ids bound into a single `IN (...)` list.
pub const IN_LIST_CHUNK: usize = 500;

/// Database connection pool wrapper.
///
/// Cloning is cheap; clones share the underlying sqlx pool and the cached
/// schema catalog.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
    catalog: Arc<OnceCell<SchemaCatalog>>,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Open a pool with explicit connection settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(
            "Database pool ready (backend: {:?}, max connections: {})",
            conn.get_database_backend(),
            settings.max_connections
        );

        Ok(Self {
            conn,
            catalog: Arc::new(OnceCell::new()),
        })
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending SeaORM migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Tables and columns present in the connected database.
    ///
    /// Read from metadata on first use and cached for the life of the process.
    /// Must not be called while a transaction holds the only pooled connection.
    pub async fn schema_catalog(&self) -> AppResult<&SchemaCatalog> {
        self.catalog
            .get_or_try_init(|| async {
                let catalog = SchemaCatalog::load(&self.conn).await?;
                info!("Schema catalog loaded: {} tables", catalog.table_count());
                Ok(catalog)
            })
            .await
    }
}

/// Fail with `NotFound` unless a row of `kind` with this id exists.
pub async fn ensure_exists<C: sea_orm::ConnectionTrait>(
    db: &C,
    kind: EntityKind,
    id: i32,
) -> AppResult<()> {
    let stmt = raw::select_ids_where_in(db, kind.table(), "id", &[id]);
    let found = raw::query_ids(db, stmt)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up {}: {}", kind, e)))?;

    if found.is_empty() {
        return Err(AppError::NotFound(format!("{} {}", kind.label(), id)));
    }
    Ok(())
}
