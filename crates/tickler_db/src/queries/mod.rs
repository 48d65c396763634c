//! Query functions, grouped by entity.
//!
//! Every reminder statement is scoped by `user_id`; ownership checks never
//! happen after the fact.

pub mod reminder;
pub mod user;
