//! Test database utilities for in-library tests.

use tempfile::TempDir;

use crate::config::DatabaseConfig;
use crate::storage::{create_pool, DbPool};

/// Fresh in-memory database with every migration applied.
pub async fn memory_pool() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        auto_migrate: true,
        ..Default::default()
    };
    create_pool(&config).await.expect("create in-memory pool")
}

/// File-backed WAL database with a multi-connection pool, as `serve` builds it.
///
/// The returned directory must outlive the pool.
pub async fn file_pool() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("medistaff.db").display()),
        max_connections: 8,
        auto_migrate: true,
        ..Default::default()
    };
    let pool = create_pool(&config).await.expect("create file-backed pool");
    (dir, pool)
}
