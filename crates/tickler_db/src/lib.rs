//! Tickler Database Layer
//!
//! SQLite-based storage for users and reminders.
//!
//! # Architecture
//!
//! - **Flat reminder schema** - one table, a frequency discriminator, and
//!   nullable variant columns; `models::ReminderRow` is the only place that
//!   layout is interpreted
//! - **Ownership at the query level** - every reminder statement filters by
//!   `user_id`
//!
//! # Usage
//!
//! ```rust,ignore
//! use tickler_db::TicklerDb;
//!
//! let db = TicklerDb::open("path/to/tickler.db").await?;
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod queries;

pub use connection::{DbStats, TicklerDb};
pub use error::{DbError, DbResult};
pub use models::{FrequencyKind, ReminderRow, UserRow};
