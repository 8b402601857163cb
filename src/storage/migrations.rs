//! # Database Migration Management
//!
//! Schema migrations are embedded in the binary and applied in version order,
//! each inside its own transaction. Applied versions are tracked together with
//! a SHA-256 checksum of their SQL so edits to an applied migration are caught.

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use tracing::{error, info};

/// An embedded migration: version, description, SQL.
struct Migration {
    version: i64,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 20250101000001,
    description: "create_staff",
    sql: include_str!("../../migrations/20250101000001_create_staff.sql"),
}];

/// Migration information structure
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MigrationInfo {
    pub version: i64,
    pub description: String,
    pub checksum: String,
    pub execution_time: i64,
    pub installed_on: DateTime<Utc>,
}

/// Run all pending database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    create_migration_table(pool).await?;
    let applied = list_applied_migrations(pool).await?;

    let mut migrations_run = 0;
    for migration in MIGRATIONS {
        let checksum = calculate_checksum(migration.sql);

        if let Some(existing) = applied.iter().find(|m| m.version == migration.version) {
            if existing.checksum != checksum {
                return Err(Error::internal(format!(
                    "Checksum mismatch for applied migration {} ({})",
                    migration.version, migration.description
                )));
            }
            continue;
        }

        info!(version = migration.version, description = migration.description, "Running migration");
        let start_time = std::time::Instant::now();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| Error::database(e, "Failed to start migration transaction"))?;

        sqlx::raw_sql(migration.sql).execute(&mut *tx).await.map_err(|e| {
            error!(error = %e, version = migration.version, "Migration failed");
            Error::database(e, format!("Migration failed: {}", migration.description))
        })?;

        sqlx::query(
            "INSERT INTO _medistaff_migrations (version, description, checksum, execution_time, installed_on) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(migration.version)
        .bind(migration.description)
        .bind(&checksum)
        .bind(start_time.elapsed().as_millis() as i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::database(e, "Failed to record migration"))?;

        tx.commit().await.map_err(|e| Error::database(e, "Failed to commit migration"))?;
        migrations_run += 1;
    }

    info!(migrations_run, total = MIGRATIONS.len(), "Database migrations complete");
    Ok(())
}

async fn create_migration_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _medistaff_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            checksum TEXT NOT NULL,
            execution_time INTEGER NOT NULL,
            installed_on TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::database(e, "Failed to create migration tracking table"))?;
    Ok(())
}

/// List applied migrations in version order
pub async fn list_applied_migrations(pool: &DbPool) -> Result<Vec<MigrationInfo>> {
    create_migration_table(pool).await?;
    sqlx::query_as::<_, MigrationInfo>(
        "SELECT version, description, checksum, execution_time, installed_on FROM _medistaff_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| Error::database(e, "Failed to list applied migrations"))
}

/// True when every embedded migration has been applied
pub async fn is_up_to_date(pool: &DbPool) -> Result<bool> {
    let applied = list_applied_migrations(pool).await?;
    Ok(MIGRATIONS.iter().all(|m| applied.iter().any(|a| a.version == m.version)))
}

fn calculate_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> DbPool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = memory_pool().await;
        assert!(!is_up_to_date(&pool).await.unwrap());

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied = list_applied_migrations(&pool).await.unwrap();
        assert_eq!(applied.len(), MIGRATIONS.len());
        assert_eq!(applied[0].description, "create_staff");
        assert!(is_up_to_date(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn checksum_mismatch_is_detected() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();

        sqlx::query("UPDATE _medistaff_migrations SET checksum = 'tampered'")
            .execute(&pool)
            .await
            .unwrap();

        assert!(run_migrations(&pool).await.is_err());
    }

    #[test]
    fn checksum_is_stable_hex() {
        let a = calculate_checksum("SELECT 1");
        assert_eq!(a, calculate_checksum("SELECT 1"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, calculate_checksum("SELECT 2"));
    }
}
