use super::{DbConn, Store, find_user_by_username, insert_user_with_default_preference};
use crate::db_error::DbResult;
use crate::models::DEFAULT_USERNAME;
use crate::{AppError, ErrorContextExt, ResultExt};
use libsql::Builder;
use prefs_contracts::codes;
use std::path::Path;

const CONNECTION_PRAGMAS: &str = r#"
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 3000;
"#;

pub async fn open_store(db_path: &Path) -> DbResult<Store> {
    if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_code(codes::DB_OPEN_FAILED, "Failed to create database directory")
            .with_ctx("dbDir", parent.display().to_string())?;
    }

    let database = Builder::new_local(db_path).build().await.map_err(|error| {
        AppError::new(codes::DB_OPEN_FAILED, "Failed to open database")
            .with_source(error)
            .with_context("dbPath", db_path.display().to_string())
    })?;

    tracing::info!(
        event = "store_opened",
        db_path = %db_path.display()
    );
    Ok(Store::new(database, db_path.to_path_buf()))
}

impl Store {
    pub async fn connect(&self) -> DbResult<DbConn> {
        let conn = self.database.connect()?;
        let _ = conn.execute_batch(CONNECTION_PRAGMAS).await?;
        Ok(conn)
    }

    /// Releases the handle. Connections still held by in-flight requests keep
    /// the underlying database open until they are dropped.
    pub fn close(self) {
        tracing::info!(
            event = "store_closed",
            db_path = %self.path.display(),
            shared_handles = std::sync::Arc::strong_count(&self.database) - 1
        );
    }
}

pub async fn init_schema(conn: &DbConn) -> DbResult<()> {
    let _ = conn
        .execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )
        .await?;

    let _ = conn
        .execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS preferences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                font_size TEXT NOT NULL DEFAULT '16px',
                theme TEXT NOT NULL DEFAULT 'light',
                base_font TEXT NOT NULL DEFAULT 'Inter, Arial, sans-serif',
                user_id INTEGER UNIQUE REFERENCES users(id)
            );
            "#,
        )
        .await?;
    Ok(())
}

/// Creates the demo user and its default preferences when missing. Returns
/// `true` only when rows were inserted.
pub async fn seed_demo_user(conn: &DbConn) -> DbResult<bool> {
    if find_user_by_username(conn, DEFAULT_USERNAME).await?.is_some() {
        return Ok(false);
    }

    let user = insert_user_with_default_preference(conn, DEFAULT_USERNAME).await?;
    tracing::info!(
        event = "demo_user_seeded",
        user_id = user.id,
        username = user.username.as_str()
    );
    Ok(true)
}

pub async fn init_store(store: &Store) -> DbResult<()> {
    let conn = store.connect().await?;
    init_schema(&conn).await?;
    let seeded = seed_demo_user(&conn).await?;
    tracing::debug!(event = "store_initialized", seeded = seeded);
    Ok(())
}
