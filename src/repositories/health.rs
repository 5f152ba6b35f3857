use sqlx::PgPool;

/// Round-trip `SELECT 1` used by the health endpoint.
pub(crate) async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
