//! Row models mirroring the stored schema.

mod reminder;
mod user;

pub use reminder::{FrequencyKind, ReminderRow};
pub use user::UserRow;
