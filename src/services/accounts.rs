//! Account service: registration, login and profile updates
//!
//! Provides:
//! - Password hashing with bcrypt (fixed cost, random per-user salt)
//! - Login that never reveals whether a username exists
//! - Username / picture updates keyed by the current username

use bcrypt::{hash, verify};
use thiserror::Error;

use crate::db::{CreateUser, Database, ProfileUpdate, StoreError, UserRecord};

/// bcrypt work factor used for every stored password
pub const BCRYPT_COST: u32 = 10;

/// Failures of account operations, independent of how they are reported
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username already in use.")]
    UsernameTaken,

    #[error("New username is already in use by another user.")]
    NewUsernameTaken,

    #[error("User not found.")]
    UserNotFound,

    /// Unknown user or wrong password; the two are never distinguished
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Password(String),
}

/// Registration input, already checked for presence
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub profile_pic_base64: String,
}

/// User data that is safe to hand back to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub username: String,
    pub profile_pic_base64: Option<String>,
}

impl From<UserRecord> for PublicUser {
    fn from(user: UserRecord) -> Self {
        Self {
            username: user.username,
            profile_pic_base64: Some(user.profile_pic_base64),
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    db: Database,
}

impl AccountService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Hash the password and insert the new user
    pub async fn register(&self, input: RegisterInput) -> Result<(), AccountError> {
        let password_hash = hash_password(input.password).await?;

        let created = self
            .db
            .users()
            .create(CreateUser {
                username: input.username.clone(),
                password_hash,
                profile_pic_base64: input.profile_pic_base64,
            })
            .await;

        match created {
            Ok(id) => {
                tracing::info!(user_id = id, username = %input.username, "User registered");
                Ok(())
            }
            Err(StoreError::UniqueViolation(_)) => Err(AccountError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    // ========================================================================
    // Login
    // ========================================================================

    /// Check credentials and return the user's public profile
    pub async fn login(&self, username: &str, password: &str) -> Result<PublicUser, AccountError> {
        let user = match self.db.users().get_by_username(username).await? {
            Some(u) => u,
            None => {
                tracing::debug!("Login rejected");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::debug!("Login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user.into())
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Rename the user and optionally replace the picture.
    ///
    /// The returned profile carries the picture only when it was replaced; the stored one
    /// is not read back.
    pub async fn update_profile(
        &self,
        current_username: &str,
        update: ProfileUpdate,
    ) -> Result<PublicUser, AccountError> {
        let affected = match self
            .db
            .users()
            .update_profile(current_username, &update)
            .await
        {
            Ok(n) => n,
            Err(StoreError::UniqueViolation(_)) => return Err(AccountError::NewUsernameTaken),
            Err(e) => return Err(e.into()),
        };

        if affected == 0 {
            return Err(AccountError::UserNotFound);
        }

        tracing::info!(
            from = %current_username,
            to = %update.new_username(),
            picture_changed = update.profile_pic_base64().is_some(),
            "Profile updated"
        );

        Ok(PublicUser {
            username: update.new_username().to_string(),
            profile_pic_base64: update.profile_pic_base64().map(str::to_string),
        })
    }
}

// ============================================================================
// Password helpers
// ============================================================================

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: String) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AccountError::Password(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AccountError::Password(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored bcrypt hash
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AccountError::Password(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AccountError::Password(format!("Failed to verify password: {}", e)))
}
