//! Business logic shared by the HTTP handlers

pub mod accounts;

pub use accounts::{AccountError, AccountService, BCRYPT_COST, PublicUser, RegisterInput};
