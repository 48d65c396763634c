//! Recurrence rules.
//!
//! Each [`Frequency`] variant computes "next occurrence on or after a
//! reference date" under its own rule. The reference date is always
//! caller-supplied; nothing here reads the wall clock.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, EasterTable, Month, Weekday};
use crate::error::{CoreError, Result};

/// Yearly-scope rules (Easter, Irregular) disambiguate between this year
/// and next, so their lead window must stay under a year.
const MAX_YEARLY_ADVANCE_DAYS: u32 = 365;

/// How often a reminder recurs.
///
/// Exactly one variant per persisted frequency tag; the persistence layer's
/// discriminator column is this enum's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Frequency {
    /// Due every day.
    Daily,
    /// Due on the same weekday each week.
    Weekly { weekday: Weekday },
    /// Due on the same day-of-month each month (day 1-27, so every month
    /// has the date).
    Monthly { month_day: u8 },
    /// Due on the same month/day each year.
    Yearly { month: Month, day: u8 },
    /// A single fixed date; never recurs.
    Once { date: NaiveDate },
    /// Due every `every` days, phase-locked to `start`.
    XDays { start: NaiveDate, every: u32 },
    /// Due on the movable Easter date each year.
    Easter,
    /// Due on the `week_number`-th `weekday` of `month`, yearly.
    Irregular {
        month: Month,
        weekday: Weekday,
        week_number: u8,
    },
}

impl Frequency {
    /// Next date this rule is due, on or after `today` when today
    /// qualifies, subject to the advance-days disambiguation.
    pub fn next_occurrence(&self, today: NaiveDate, advance_days: u32) -> Result<NaiveDate> {
        self.next_occurrence_with(today, advance_days, &mut EasterTable::new())
    }

    /// As [`next_occurrence`](Self::next_occurrence), sharing an
    /// [`EasterTable`] across calls when evaluating many items.
    pub fn next_occurrence_with(
        &self,
        today: NaiveDate,
        advance_days: u32,
        easter: &mut EasterTable,
    ) -> Result<NaiveDate> {
        match *self {
            Self::Daily => Ok(today),
            Self::Weekly { weekday } => Ok(weekly_occurrence(today, weekday, advance_days)),
            Self::Monthly { month_day } => {
                let year = today.year();
                let month = today.month();
                let this_cycle = calendar::make_date(year, month, u32::from(month_day))?;
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let next_cycle =
                    calendar::make_date(next_year, next_month, u32::from(month_day))?;
                Ok(pick_cycle(today, this_cycle, next_cycle, advance_days))
            }
            Self::Yearly { month, day } => {
                let this_cycle = calendar::make_date(today.year(), month.number(), u32::from(day))?;
                let next_cycle =
                    calendar::make_date(today.year() + 1, month.number(), u32::from(day))?;
                Ok(pick_cycle(today, this_cycle, next_cycle, advance_days))
            }
            Self::Once { date } => Ok(date),
            Self::XDays { start, every } => {
                // Phase-locked to start's remainder class: the result is the
                // next boundary after the aligned date at or before today,
                // which can be in the future even when today is aligned.
                let since_start = (today - start).num_days();
                let since_last = since_start.rem_euclid(i64::from(every));
                let prior = today - Duration::days(since_last);
                Ok(prior + Duration::days(i64::from(every)))
            }
            Self::Easter => {
                check_yearly_advance(advance_days)?;
                let this_cycle = easter.date(today.year());
                let next_cycle = easter.date(today.year() + 1);
                Ok(pick_cycle(today, this_cycle, next_cycle, advance_days))
            }
            Self::Irregular {
                month,
                weekday,
                week_number,
            } => {
                check_yearly_advance(advance_days)?;
                let this_cycle =
                    calendar::nth_weekday_of_month(today.year(), month, week_number, weekday)?;
                let next_cycle =
                    calendar::nth_weekday_of_month(today.year() + 1, month, week_number, weekday)?;
                Ok(pick_cycle(today, this_cycle, next_cycle, advance_days))
            }
        }
    }
}

/// Human-readable frequency label, one category per variant.
impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly { weekday } => write!(f, "{}", weekday.short_name()),
            Self::Monthly { month_day } => write!(f, "Monthly, day {month_day}"),
            Self::Yearly { month, day } => write!(f, "{} {day}", month.short_name()),
            Self::Once { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::XDays { every, .. } => write!(f, "Every {every} days"),
            Self::Easter => write!(f, "Easter"),
            Self::Irregular { .. } => write!(f, "Irregular"),
        }
    }
}

/// Shared disambiguation between a "this cycle" and "next cycle" candidate:
/// once the reference date enters the lead window before the next cycle's
/// date, the rule already points at the next cycle.
fn pick_cycle(
    today: NaiveDate,
    this_cycle: NaiveDate,
    next_cycle: NaiveDate,
    advance_days: u32,
) -> NaiveDate {
    if today > next_cycle - Duration::days(i64::from(advance_days)) {
        next_cycle
    } else {
        this_cycle
    }
}

/// Weekly's lookback variant of the disambiguation: the most recent past or
/// current occurrence is the default candidate, and the week rolls forward
/// only once the reference date enters its lead window (`>=`, unlike the
/// shared rule's strict `>`). The asymmetry is deliberate.
fn weekly_occurrence(today: NaiveDate, weekday: Weekday, advance_days: u32) -> NaiveDate {
    let diff = i64::from(Weekday::from_date(today).number()) - i64::from(weekday.number());
    let this_week = match diff.cmp(&0) {
        Ordering::Equal => today,
        Ordering::Less => today + Duration::days(-diff),
        Ordering::Greater => today + Duration::days(7 - diff),
    };
    if today >= this_week - Duration::days(i64::from(advance_days)) {
        this_week
    } else {
        this_week - Duration::days(7)
    }
}

fn check_yearly_advance(advance_days: u32) -> Result<()> {
    if advance_days >= MAX_YEARLY_ADVANCE_DAYS {
        return Err(CoreError::AdvanceWindowTooWide { advance_days });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_is_always_due_today() {
        for day in [date(2020, 1, 1), date(2021, 2, 28), date(2024, 2, 29)] {
            assert_eq!(Frequency::Daily.next_occurrence(day, 0).unwrap(), day);
        }
    }

    // 2020-11-16 was a Monday. Weekly defaults to the most recent past or
    // current occurrence, unlike the forward-looking rules.
    #[test]
    fn weekly_on_its_own_weekday_returns_today() {
        let rule = Frequency::Weekly {
            weekday: Weekday::Monday,
        };
        assert_eq!(
            rule.next_occurrence(date(2020, 11, 16), 0).unwrap(),
            date(2020, 11, 16)
        );
    }

    #[test]
    fn weekly_looks_back_to_the_previous_occurrence() {
        let tuesday = Frequency::Weekly {
            weekday: Weekday::Tuesday,
        };
        assert_eq!(
            tuesday.next_occurrence(date(2020, 11, 16), 0).unwrap(),
            date(2020, 11, 10)
        );

        let sunday = Frequency::Weekly {
            weekday: Weekday::Sunday,
        };
        assert_eq!(
            sunday.next_occurrence(date(2020, 11, 16), 0).unwrap(),
            date(2020, 11, 15)
        );
    }

    #[test]
    fn weekly_advance_window_rolls_to_the_upcoming_occurrence() {
        // Tuesday rule on a Monday with one day of lead time: the upcoming
        // Tuesday is inside the window, so it wins over last Tuesday.
        let rule = Frequency::Weekly {
            weekday: Weekday::Tuesday,
        };
        assert_eq!(
            rule.next_occurrence(date(2020, 11, 16), 1).unwrap(),
            date(2020, 11, 17)
        );
    }

    #[test]
    fn monthly_stays_on_this_cycle_until_the_window_opens() {
        let rule = Frequency::Monthly { month_day: 20 };
        // With a 25-day lead the boundary for April 20 is March 26; the
        // strict comparison keeps March 20 on the boundary itself and
        // flips one day later.
        assert_eq!(
            rule.next_occurrence(date(2021, 3, 26), 25).unwrap(),
            date(2021, 3, 20)
        );
        assert_eq!(
            rule.next_occurrence(date(2021, 3, 27), 25).unwrap(),
            date(2021, 4, 20)
        );
        // A short lead never reaches back past this month's own date.
        assert_eq!(
            rule.next_occurrence(date(2021, 4, 15), 5).unwrap(),
            date(2021, 4, 20)
        );
    }

    #[test]
    fn monthly_crosses_the_year_boundary() {
        let rule = Frequency::Monthly { month_day: 10 };
        // Inside January's 20-day lead window, the next cycle is January 10
        // of the following year.
        assert_eq!(
            rule.next_occurrence(date(2020, 12, 28), 20).unwrap(),
            date(2021, 1, 10)
        );
        // Without the window the rule still points back at December 10.
        assert_eq!(
            rule.next_occurrence(date(2020, 12, 28), 5).unwrap(),
            date(2020, 12, 10)
        );
    }

    #[test]
    fn yearly_disambiguates_between_years() {
        let rule = Frequency::Yearly {
            month: Month::June,
            day: 15,
        };
        assert_eq!(
            rule.next_occurrence(date(2021, 3, 1), 0).unwrap(),
            date(2021, 6, 15)
        );
        // Past this year's date but outside next year's window.
        assert_eq!(
            rule.next_occurrence(date(2021, 8, 1), 0).unwrap(),
            date(2021, 6, 15)
        );
        // Inside next year's lead window.
        assert_eq!(
            rule.next_occurrence(date(2022, 6, 10), 10).unwrap(),
            date(2022, 6, 15)
        );
    }

    #[test]
    fn yearly_february_29_fails_in_a_non_leap_year() {
        let rule = Frequency::Yearly {
            month: Month::February,
            day: 29,
        };
        // Reference year 2023 is not a leap year; the rule must error out
        // rather than shift to a nearby date.
        let err = rule.next_occurrence(date(2023, 1, 1), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { .. }));
        // In a leap year the this-cycle date exists, but year+1 doesn't.
        let err = rule.next_occurrence(date(2024, 1, 1), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { .. }));
    }

    #[test]
    fn once_ignores_the_reference_date() {
        let rule = Frequency::Once {
            date: date(2021, 5, 1),
        };
        assert_eq!(
            rule.next_occurrence(date(2020, 1, 1), 0).unwrap(),
            date(2021, 5, 1)
        );
        assert_eq!(
            rule.next_occurrence(date(2022, 1, 1), 0).unwrap(),
            date(2021, 5, 1)
        );
    }

    #[test]
    fn xdays_reports_the_next_phase_boundary_even_when_aligned_today() {
        let rule = Frequency::XDays {
            start: date(2010, 1, 1),
            every: 3,
        };
        assert_eq!(
            rule.next_occurrence(date(2010, 1, 1), 0).unwrap(),
            date(2010, 1, 4)
        );
    }

    #[test]
    fn xdays_phase_locks_to_the_start_date() {
        let rule = Frequency::XDays {
            start: date(2010, 1, 1),
            every: 3,
        };
        // Jan 2 and 3 share the Jan 1 anchor, so both point at Jan 4.
        assert_eq!(
            rule.next_occurrence(date(2010, 1, 2), 0).unwrap(),
            date(2010, 1, 4)
        );
        assert_eq!(
            rule.next_occurrence(date(2010, 1, 3), 0).unwrap(),
            date(2010, 1, 4)
        );
        assert_eq!(
            rule.next_occurrence(date(2010, 1, 4), 0).unwrap(),
            date(2010, 1, 7)
        );
    }

    #[test]
    fn xdays_handles_a_reference_date_before_the_start() {
        let rule = Frequency::XDays {
            start: date(2010, 1, 10),
            every: 7,
        };
        // Phase class is preserved going backwards as well.
        assert_eq!(
            rule.next_occurrence(date(2010, 1, 5), 0).unwrap(),
            date(2010, 1, 10)
        );
    }

    #[test]
    fn easter_resolves_the_gaussian_date() {
        assert_eq!(
            Frequency::Easter.next_occurrence(date(2021, 2, 1), 0).unwrap(),
            date(2021, 4, 4)
        );
        // After this year's Easter, the rule still reports it until next
        // year's lead window opens.
        assert_eq!(
            Frequency::Easter.next_occurrence(date(2021, 6, 1), 0).unwrap(),
            date(2021, 4, 4)
        );
    }

    #[test]
    fn easter_rejects_a_year_wide_advance_window() {
        let err = Frequency::Easter
            .next_occurrence(date(2021, 2, 1), 365)
            .unwrap_err();
        assert!(matches!(err, CoreError::AdvanceWindowTooWide { .. }));
    }

    #[test]
    fn irregular_resolves_presidents_day() {
        // Third Monday of February, 30 days of lead time: on 2021-02-01 the
        // 2021 resolution wins, not a rollover to 2022.
        let rule = Frequency::Irregular {
            month: Month::February,
            weekday: Weekday::Monday,
            week_number: 3,
        };
        assert_eq!(
            rule.next_occurrence(date(2021, 2, 1), 30).unwrap(),
            date(2021, 2, 15)
        );
    }

    #[test]
    fn irregular_errors_on_a_missing_occurrence() {
        let rule = Frequency::Irregular {
            month: Month::February,
            weekday: Weekday::Friday,
            week_number: 5,
        };
        let err = rule.next_occurrence(date(2021, 1, 1), 0).unwrap_err();
        assert!(matches!(err, CoreError::NthWeekdayOutOfRange { .. }));
    }

    #[test]
    fn shared_easter_table_does_not_change_results() {
        let mut table = EasterTable::new();
        let rule = Frequency::Easter;
        for day in [date(2020, 1, 1), date(2021, 3, 15), date(2022, 11, 30)] {
            assert_eq!(
                rule.next_occurrence_with(day, 10, &mut table).unwrap(),
                rule.next_occurrence(day, 10).unwrap()
            );
        }
    }

    #[test]
    fn frequency_labels() {
        assert_eq!(Frequency::Daily.to_string(), "Daily");
        assert_eq!(
            Frequency::Weekly {
                weekday: Weekday::Monday
            }
            .to_string(),
            "Mon"
        );
        assert_eq!(Frequency::Monthly { month_day: 5 }.to_string(), "Monthly, day 5");
        assert_eq!(
            Frequency::Yearly {
                month: Month::January,
                day: 1
            }
            .to_string(),
            "Jan 1"
        );
        assert_eq!(
            Frequency::Once {
                date: date(2021, 5, 1)
            }
            .to_string(),
            "2021-05-01"
        );
        assert_eq!(
            Frequency::XDays {
                start: date(2010, 1, 1),
                every: 3
            }
            .to_string(),
            "Every 3 days"
        );
        assert_eq!(Frequency::Easter.to_string(), "Easter");
        assert_eq!(
            Frequency::Irregular {
                month: Month::February,
                weekday: Weekday::Monday,
                week_number: 3
            }
            .to_string(),
            "Irregular"
        );
    }
}
