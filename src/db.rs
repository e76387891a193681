use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::AppConfig;
use crate::migrator::Migrator;

/// Alias kept so call sites stay stable if pooling details change.
pub type DbPool = DatabaseConnection;

/// Connects using the application's pool settings.
pub async fn establish_connection(config: &AppConfig) -> Result<DbPool, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connection established");
    Ok(db)
}

/// Applies all pending embedded migrations.
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    info!("Running database migrations");
    Migrator::up(db, None).await?;
    info!("Database migrations complete");
    Ok(())
}

/// Cheap liveness probe for the health endpoint.
pub async fn check_connection(db: &DbPool) -> bool {
    db.ping().await.is_ok()
}
