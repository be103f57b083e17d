//! Users repository
//!
//! Every statement against the `users` table goes through here. Driver errors are
//! classified on the way out so callers only ever see [StoreError].

use sqlx::SqlitePool as Pool;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    /// The statement would duplicate a value in a UNIQUE column
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let unique = err
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation())
            .map(|db_err| db_err.message().to_string());

        match unique {
            Some(message) => StoreError::UniqueViolation(message),
            None => StoreError::Database(err),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub profile_pic_base64: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub profile_pic_base64: String,
}

/// Which columns an update-profile request touches.
///
/// Each variant maps to one fixed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    UsernameOnly {
        new_username: String,
    },
    UsernameAndPicture {
        new_username: String,
        profile_pic_base64: String,
    },
}

impl ProfileUpdate {
    /// Pick the variant from an optional new picture
    pub fn new(new_username: String, profile_pic_base64: Option<String>) -> Self {
        match profile_pic_base64 {
            Some(profile_pic_base64) => ProfileUpdate::UsernameAndPicture {
                new_username,
                profile_pic_base64,
            },
            None => ProfileUpdate::UsernameOnly { new_username },
        }
    }

    pub fn new_username(&self) -> &str {
        match self {
            ProfileUpdate::UsernameOnly { new_username }
            | ProfileUpdate::UsernameAndPicture { new_username, .. } => new_username,
        }
    }

    pub fn profile_pic_base64(&self) -> Option<&str> {
        match self {
            ProfileUpdate::UsernameOnly { .. } => None,
            ProfileUpdate::UsernameAndPicture {
                profile_pic_base64, ..
            } => Some(profile_pic_base64),
        }
    }
}

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: Pool,
}

impl UsersRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Insert a new user, returning its generated id
    pub async fn create(&self, user: CreateUser) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password, profile_pic_base64) VALUES (?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.profile_pic_base64)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get user by username (exact match)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String, String)>(
            "SELECT id, username, password, profile_pic_base64 FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.0,
            username: r.1,
            password_hash: r.2,
            profile_pic_base64: r.3,
        }))
    }

    /// Apply a profile update to the row named `current_username`.
    ///
    /// Returns the number of rows affected; zero means no such user.
    pub async fn update_profile(
        &self,
        current_username: &str,
        update: &ProfileUpdate,
    ) -> Result<u64, StoreError> {
        let result = match update {
            ProfileUpdate::UsernameOnly { new_username } => {
                sqlx::query("UPDATE users SET username = ? WHERE username = ?")
                    .bind(new_username)
                    .bind(current_username)
                    .execute(&self.pool)
                    .await?
            }
            ProfileUpdate::UsernameAndPicture {
                new_username,
                profile_pic_base64,
            } => {
                sqlx::query(
                    "UPDATE users SET username = ?, profile_pic_base64 = ? WHERE username = ?",
                )
                .bind(new_username)
                .bind(profile_pic_base64)
                .bind(current_username)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }
}
