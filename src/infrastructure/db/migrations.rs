use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending schema migrations. Runs at startup, before the server
/// accepts its first request.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
