// Schema Migrations
//
// Sequential migrations tracked in schema_version; each migration SQL file
// is compiled in and applied inside one transaction.

use sqlx::SqlitePool;
use tracing::info;
use uneventful_core::error::{AppError, Result};

const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "initial schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Bring the database up to the latest schema version.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current = current_version(pool).await?;
    info!(version = current, "Current schema version");

    for (version, label, sql) in MIGRATIONS {
        if *version > current {
            info!(version, label, "Applying migration");
            apply_migration(pool, sql).await?;
        }
    }

    Ok(())
}

async fn current_version(pool: &SqlitePool) -> Result<i64> {
    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    if table_exists == 0 {
        return Ok(0);
    }

    let version: Option<i64> =
        sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(version.unwrap_or(0))
}

async fn apply_migration(pool: &SqlitePool, sql: &str) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    for statement in statements(sql) {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {}", e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(())
}

/// Split a migration file into executable statements, dropping `--` comment
/// lines. No statement in our migrations embeds a semicolon in a literal.
fn statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|stmt| {
            stmt.lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|stmt| !stmt.is_empty())
        .collect()
}
