use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open the connection pool. Called once at startup; the pool is cloned into
/// request handlers and closed when the process exits.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}
