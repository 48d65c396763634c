//! Error types for the recurrence engine.

use miette::Diagnostic;
use thiserror::Error;

use crate::calendar::{Month, Weekday};

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by recurrence computation and field validation.
///
/// A wrong "next occurrence" silently breaks a reminder's entire purpose,
/// so degenerate inputs always produce an explicit error rather than an
/// approximated date.
#[derive(Debug, Error, Diagnostic)]
pub enum CoreError {
    /// The requested year/month/day doesn't exist on the calendar
    /// (e.g. February 29 in a non-leap year, April 31).
    #[error("no such calendar date: {year:04}-{month:02}-{day:02}")]
    #[diagnostic(code(tickler_core::invalid_date))]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The requested occurrence of a weekday doesn't exist in the month
    /// (e.g. a 5th Friday in a month that only has four).
    #[error("{month} {year} has no {week_number}th {weekday}")]
    #[diagnostic(
        code(tickler_core::nth_weekday_out_of_range),
        help("week_number must not exceed the number of that weekday's occurrences in the month")
    )]
    NthWeekdayOutOfRange {
        year: i32,
        month: Month,
        weekday: Weekday,
        week_number: u8,
    },

    /// Yearly-scope rules disambiguate between this year and next, so a
    /// lead window of a year or more would always point at the next cycle.
    #[error("advance_days must be < 365 for yearly-scope rules, got {advance_days}")]
    #[diagnostic(code(tickler_core::advance_window_too_wide))]
    AdvanceWindowTooWide { advance_days: u32 },

    /// A weekday number outside the domain's 1 (Sunday) to 7 (Saturday) range.
    #[error("invalid weekday number: {value} (expected 1-7, Sunday=1)")]
    #[diagnostic(code(tickler_core::invalid_weekday))]
    InvalidWeekday { value: i64 },

    /// A month number outside 1 (January) to 12 (December).
    #[error("invalid month number: {value} (expected 1-12)")]
    #[diagnostic(code(tickler_core::invalid_month))]
    InvalidMonth { value: i64 },

    /// An unrecognized category tag.
    #[error("invalid category: {value:?}")]
    #[diagnostic(code(tickler_core::invalid_category))]
    InvalidCategory { value: String },
}
