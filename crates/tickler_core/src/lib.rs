//! Tickler Core - Recurrence Engine and Domain Model
//!
//! Pure, synchronous calendar computation: recurrence rules, the
//! visibility policy, and the calendar helpers they share. No I/O, no
//! clock access; every evaluation takes an explicit reference date.

pub mod calendar;
pub mod error;
pub mod frequency;
pub mod reminder;

pub use calendar::{days_in_month, easter, is_leap_year, nth_weekday_of_month};
pub use calendar::{EasterTable, Month, Weekday};
pub use error::{CoreError, Result};
pub use frequency::Frequency;
pub use reminder::{Category, Reminder};
