//! User account rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user.
///
/// The password hash is stored alongside the account; verification happens
/// at the auth boundary, never here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    /// Unique identifier
    pub id: i64,

    /// Login name, unique across the service
    pub username: String,

    /// Contact email
    pub email: String,

    /// Whether the account can log in
    pub active: bool,

    /// Argon2 password hash string
    pub password_hash: String,
}
