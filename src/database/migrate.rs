use crate::error::Result;
use sqlx::PgPool;
use tracing::info;

/// Applies the embedded migrations. Already-applied versions are skipped, so
/// running this on every start is safe.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Applying database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}
