use sqlx::SqlitePool;

use crate::schema::MIGRATION_STATEMENTS_SQL;
use crate::SqliteStoreError;

/// Creates the schema. Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteStoreError> {
    for statement in MIGRATION_STATEMENTS_SQL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(SqliteStoreError::Migration)?;
    }

    Ok(())
}
