/// Embedded schema migrations
///
/// Migrations live in `taskboard-shared/migrations/` and are compiled into
/// the binary with `sqlx::migrate!`, so a deployed server needs no files on
/// disk to bring its schema up to date.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration
///
/// # Errors
///
/// Returns an error if a migration fails or an applied migration was modified.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        known_migrations = MIGRATOR.iter().count(),
        "Running database migrations"
    );

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
