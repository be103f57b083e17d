//! Mami Cafe accounts backend
//!
//! A small JSON API over a single SQLite `users` table: register, login and update-profile.

pub mod api;
pub mod config;
pub mod db;
pub mod services;

use crate::db::Database;
use crate::services::AccountService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            db,
        }
    }
}
