//! Database migration support.
//!
//! Embeds the `users` / `tasks` schema from `tasker_core/migrations/`.

use sqlx::PgPool;

/// Apply every pending schema migration to the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
