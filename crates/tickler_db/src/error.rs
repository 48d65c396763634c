//! Error types for the database layer.

use miette::Diagnostic;
use thiserror::Error;
use tickler_core::CoreError;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Database error types.
#[derive(Debug, Error, Diagnostic)]
pub enum DbError {
    /// SQLite/sqlx error
    #[error("Database error: {0}")]
    #[diagnostic(code(tickler_db::database))]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    #[diagnostic(code(tickler_db::migration))]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error (for filesystem operations)
    #[error("IO error: {0}")]
    #[diagnostic(code(tickler_db::io))]
    Io(#[from] std::io::Error),

    /// Domain-level validation error surfaced while mapping stored data
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] CoreError),

    /// A stored record that can't be mapped back to a rule variant.
    /// Indicates storage corruption; never silently defaulted.
    #[error("corrupt reminder record {id}: {reason}")]
    #[diagnostic(
        code(tickler_db::corrupt_record),
        help("the frequency discriminator and its variant columns are out of sync")
    )]
    Corrupt { id: i64, reason: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    #[diagnostic(code(tickler_db::not_found))]
    NotFound { entity: &'static str, id: i64 },

    /// Duplicate entity
    #[error("{entity} already exists: {key}")]
    #[diagnostic(code(tickler_db::already_exists))]
    AlreadyExists { entity: &'static str, key: String },
}

impl DbError {
    /// Create a corrupt-record error.
    pub fn corrupt(id: i64, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            id,
            reason: reason.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
