//! Calendar arithmetic shared by the recurrence rules.
//!
//! Weekday and month numbering here is the domain's own: weekdays run
//! Sunday=1 through Saturday=7, months January=1 through December=12.
//! Conversions to and from chrono's numbering happen only in this module.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Day of the week in the domain numbering: Sunday=1 .. Saturday=7.
///
/// Distinct from chrono's `number_from_monday`/`num_days_from_sunday`
/// numbering; convert explicitly via [`Weekday::from_date`] and
/// [`Weekday::number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    /// Domain number, 1 (Sunday) through 7 (Saturday).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse a domain weekday number.
    pub fn from_number(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::Sunday),
            2 => Ok(Self::Monday),
            3 => Ok(Self::Tuesday),
            4 => Ok(Self::Wednesday),
            5 => Ok(Self::Thursday),
            6 => Ok(Self::Friday),
            7 => Ok(Self::Saturday),
            _ => Err(CoreError::InvalidWeekday { value }),
        }
    }

    /// Weekday of a calendar date, mapped into the domain numbering.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }

    /// Three-letter name used in frequency labels.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sunday => write!(f, "Sunday"),
            Self::Monday => write!(f, "Monday"),
            Self::Tuesday => write!(f, "Tuesday"),
            Self::Wednesday => write!(f, "Wednesday"),
            Self::Thursday => write!(f, "Thursday"),
            Self::Friday => write!(f, "Friday"),
            Self::Saturday => write!(f, "Saturday"),
        }
    }
}

/// Month of the year, January=1 .. December=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// Month number, 1 through 12.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Parse a month number.
    pub fn from_number(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::January),
            2 => Ok(Self::February),
            3 => Ok(Self::March),
            4 => Ok(Self::April),
            5 => Ok(Self::May),
            6 => Ok(Self::June),
            7 => Ok(Self::July),
            8 => Ok(Self::August),
            9 => Ok(Self::September),
            10 => Ok(Self::October),
            11 => Ok(Self::November),
            12 => Ok(Self::December),
            _ => Err(CoreError::InvalidMonth { value }),
        }
    }

    /// Three-letter name used in frequency labels ("Jan 1" style).
    pub fn short_name(self) -> &'static str {
        match self {
            Self::January => "Jan",
            Self::February => "Feb",
            Self::March => "Mar",
            Self::April => "Apr",
            Self::May => "May",
            Self::June => "Jun",
            Self::July => "Jul",
            Self::August => "Aug",
            Self::September => "Sep",
            Self::October => "Oct",
            Self::November => "Nov",
            Self::December => "Dec",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::January => write!(f, "January"),
            Self::February => write!(f, "February"),
            Self::March => write!(f, "March"),
            Self::April => write!(f, "April"),
            Self::May => write!(f, "May"),
            Self::June => write!(f, "June"),
            Self::July => write!(f, "July"),
            Self::August => write!(f, "August"),
            Self::September => write!(f, "September"),
            Self::October => write!(f, "October"),
            Self::November => write!(f, "November"),
            Self::December => write!(f, "December"),
        }
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a month, accounting for leap years.
pub fn days_in_month(year: i32, month: Month) -> u32 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Build a date, reporting an explicit error for impossible combinations
/// (February 29 in a non-leap year, day 31 in a 30-day month, ...).
pub fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CoreError::InvalidDate { year, month, day })
}

/// Easter date for a year, by the Gaussian algorithm.
///
/// Pure integer arithmetic; the same year always yields the same date, so
/// callers evaluating many items can memoize with [`EasterTable`].
pub fn easter(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = ((19 * a) + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + (2 * e) + (2 * i) - h - k) % 7;
    let m = (a + (11 * h) + (22 * l)) / 451;
    let month = (h + l - (7 * m) + 114) / 31;
    let day = ((h + l - (7 * m) + 114) % 31) + 1;
    // The formula always lands in March or April.
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("Gaussian Easter produces a valid date")
}

/// Per-year memoization table for [`easter`].
///
/// Owned by the caller, never process-global. Using it changes cost only,
/// never results.
#[derive(Debug, Default)]
pub struct EasterTable {
    cache: HashMap<i32, NaiveDate>,
}

impl EasterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Easter date for `year`, computed at most once per table.
    pub fn date(&mut self, year: i32) -> NaiveDate {
        *self.cache.entry(year).or_insert_with(|| easter(year))
    }
}

/// The `week_number`-th occurrence (1-indexed) of `weekday` within a month.
///
/// Scans every day of the month; if the month has fewer occurrences of that
/// weekday, this is a validation error rather than a silently wrong date.
pub fn nth_weekday_of_month(
    year: i32,
    month: Month,
    week_number: u8,
    weekday: Weekday,
) -> Result<NaiveDate> {
    let first = make_date(year, month.number(), 1)?;
    let mut seen = 0u8;
    for date in first.iter_days().take(days_in_month(year, month) as usize) {
        if Weekday::from_date(date) == weekday {
            seen += 1;
            if seen == week_number {
                return Ok(date);
            }
        }
    }
    Err(CoreError::NthWeekdayOutOfRange {
        year,
        month,
        weekday,
        week_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_numbering_starts_at_sunday() {
        assert_eq!(Weekday::Sunday.number(), 1);
        assert_eq!(Weekday::Monday.number(), 2);
        assert_eq!(Weekday::Saturday.number(), 7);
        assert_eq!(Weekday::Monday.to_string(), "Monday");
    }

    #[test]
    fn weekday_from_date_uses_domain_numbering() {
        // 2020-11-16 was a Monday.
        assert_eq!(Weekday::from_date(date(2020, 11, 16)), Weekday::Monday);
        assert_eq!(Weekday::from_date(date(2020, 11, 15)), Weekday::Sunday);
        assert_eq!(Weekday::from_date(date(2020, 11, 21)), Weekday::Saturday);
    }

    #[test]
    fn weekday_from_number_rejects_out_of_range() {
        assert!(Weekday::from_number(0).is_err());
        assert!(Weekday::from_number(8).is_err());
        assert_eq!(Weekday::from_number(2).unwrap(), Weekday::Monday);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2021, Month::February), 28);
        assert_eq!(days_in_month(2020, Month::February), 29);
        assert_eq!(days_in_month(1900, Month::February), 28); // century, not leap
        assert_eq!(days_in_month(2000, Month::February), 29); // 400-year rule
        assert_eq!(days_in_month(2021, Month::April), 30);
        assert_eq!(days_in_month(2021, Month::December), 31);
    }

    #[test]
    fn make_date_rejects_impossible_dates() {
        assert!(make_date(2021, 2, 29).is_err());
        assert!(make_date(2021, 4, 31).is_err());
        assert_eq!(make_date(2020, 2, 29).unwrap(), date(2020, 2, 29));
    }

    #[test]
    fn easter_matches_known_almanac_dates() {
        assert_eq!(easter(2021), date(2021, 4, 4));
        assert_eq!(easter(2010), date(2010, 4, 4));
        assert_eq!(easter(2000), date(2000, 4, 23));
        assert_eq!(easter(2024), date(2024, 3, 31));
        assert_eq!(easter(2025), date(2025, 4, 20));
    }

    #[test]
    fn easter_table_matches_direct_computation() {
        let mut table = EasterTable::new();
        for year in 1990..2040 {
            assert_eq!(table.date(year), easter(year));
            // Second lookup hits the cache and must agree.
            assert_eq!(table.date(year), easter(year));
        }
    }

    #[test]
    fn nth_weekday_resolves_presidents_day() {
        // Third Monday of February 2021.
        let found = nth_weekday_of_month(2021, Month::February, 3, Weekday::Monday).unwrap();
        assert_eq!(found, date(2021, 2, 15));
    }

    #[test]
    fn nth_weekday_includes_the_last_day_of_the_month() {
        // 2021-01-31 is the fifth Sunday of January 2021.
        let found = nth_weekday_of_month(2021, Month::January, 5, Weekday::Sunday).unwrap();
        assert_eq!(found, date(2021, 1, 31));
    }

    #[test]
    fn nth_weekday_errors_when_occurrence_is_missing() {
        // February 2021 has only four of each weekday.
        let err = nth_weekday_of_month(2021, Month::February, 5, Weekday::Friday).unwrap_err();
        assert!(matches!(err, CoreError::NthWeekdayOutOfRange { .. }));
    }
}
