use std::sync::Arc;

use sealfolio_core::db::{self, DbPool};
use tempfile::TempDir;

/// Provisions a fresh on-disk SQLite database with migrations applied.
/// The TempDir guard must stay alive for the duration of the test.
pub fn setup_test_db() -> (Arc<DbPool>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir
        .path()
        .join("collection.db")
        .to_str()
        .expect("Temp path is not valid UTF-8")
        .to_string();

    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    (pool, temp_dir)
}
