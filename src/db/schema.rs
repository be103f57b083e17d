//! Startup schema initialization
//!
//! The service owns a single table. It is created on first start and left alone afterwards;
//! running the initializer against an existing database is a no-op.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

pub const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        profile_pic_base64 TEXT NOT NULL
    )
"#;

/// Result of a schema initialization run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SchemaInitResult {
    pub tables_created: Vec<String>,
}

impl SchemaInitResult {
    pub fn created(&self, table: &str) -> bool {
        self.tables_created.iter().any(|t| t == table)
    }
}

/// Check if a table exists in the database
pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Ensure the `users` table exists.
pub async fn init_schema(pool: &SqlitePool) -> Result<SchemaInitResult> {
    let mut result = SchemaInitResult::default();

    let existed = table_exists(pool, USERS_TABLE)
        .await
        .context("Failed to inspect database schema")?;

    debug!("Ensuring table {}: {}", USERS_TABLE, CREATE_USERS_TABLE.trim());
    sqlx::query(CREATE_USERS_TABLE)
        .execute(pool)
        .await
        .context("Error creating table 'users'")?;

    if existed {
        info!(table = USERS_TABLE, "Table already present");
    } else {
        info!(table = USERS_TABLE, "Created table");
        result.tables_created.push(USERS_TABLE.to_string());
    }

    Ok(result)
}
