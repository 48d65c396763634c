//! Request payloads.
//!
//! Create payloads validate their fields and build a fresh domain item;
//! update payloads patch an existing one. Accepted ranges: month 1-12,
//! weekday 1-7 (Sunday=1), week number 1-4, month day 1-27. Day 28-31 is
//! rejected for monthly items so every month has the date; yearly items
//! keep the full 1-31 range and fail at evaluation time for impossible
//! combinations instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tickler_core::{Category, Frequency, Month, Reminder, Weekday};

use crate::error::{ApiError, Validator};

/// Credentials for token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// New-account payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn default_note() -> String {
    String::new()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDaily {
    pub description: String,
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWeekly {
    pub description: String,
    pub start_date: NaiveDate,
    /// Domain weekday number, Sunday=1 .. Saturday=7.
    pub week_day: i64,
    #[serde(default = "default_note")]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMonthly {
    pub description: String,
    pub advance_days: u32,
    pub month_day: i64,
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateYearly {
    pub description: String,
    pub month: i64,
    pub day: i64,
    #[serde(default)]
    pub advance_days: u32,
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOnce {
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub advance_days: u32,
    #[serde(default = "default_note")]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateXDays {
    pub description: String,
    pub start_date: NaiveDate,
    pub days: i64,
    #[serde(default = "default_note")]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEaster {
    pub description: String,
    #[serde(default)]
    pub advance_days: u32,
    #[serde(default = "default_note")]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIrregular {
    pub description: String,
    pub advance_days: u32,
    pub month: i64,
    /// Domain weekday number, Sunday=1 .. Saturday=7.
    pub week_day: i64,
    /// Which occurrence of the weekday within the month, 1-4.
    pub week: i64,
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn new_item(
    user_id: i64,
    today: NaiveDate,
    description: &str,
    note: &str,
    frequency: Frequency,
    start_date: Option<NaiveDate>,
    advance_days: u32,
) -> Reminder {
    Reminder {
        id: Reminder::UNSAVED_ID,
        user_id,
        description: description.trim().to_string(),
        note: note.trim().to_string(),
        category: Category::Task,
        frequency,
        date_added: today,
        date_completed: None,
        start_date,
        advance_days,
    }
}

fn check_description(v: &mut Validator, description: &str) {
    v.check(
        !description.trim().is_empty(),
        "description must not be empty",
    );
}

fn check_month(v: &mut Validator, month: i64) {
    v.check((1..=12).contains(&month), "month must be between 1 and 12");
}

fn check_week_day(v: &mut Validator, week_day: i64) {
    v.check(
        (1..=7).contains(&week_day),
        "week_day must be between 1 and 7",
    );
}

fn check_yearly_advance(v: &mut Validator, advance_days: u32) {
    v.check(advance_days < 365, "advance_days must be less than 365");
}

impl CreateDaily {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        v.finish()?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Daily,
            Some(self.start_date.unwrap_or(today)),
            0,
        ))
    }
}

impl CreateWeekly {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        check_week_day(&mut v, self.week_day);
        v.finish()?;
        let weekday = Weekday::from_number(self.week_day).map_err(core_invalid)?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Weekly { weekday },
            Some(self.start_date),
            0,
        ))
    }
}

impl CreateMonthly {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        v.check(
            (1..=27).contains(&self.month_day),
            "month_day must be between 1 and 27",
        );
        v.finish()?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Monthly {
                month_day: self.month_day as u8,
            },
            Some(self.start_date.unwrap_or(today)),
            self.advance_days,
        ))
    }
}

impl CreateYearly {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        check_month(&mut v, self.month);
        v.check((1..=31).contains(&self.day), "day must be between 1 and 31");
        v.finish()?;
        let month = Month::from_number(self.month).map_err(core_invalid)?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Yearly {
                month,
                day: self.day as u8,
            },
            Some(self.start_date.unwrap_or(today)),
            self.advance_days,
        ))
    }
}

impl CreateOnce {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        v.finish()?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Once { date: self.date },
            Some(self.date),
            self.advance_days,
        ))
    }
}

impl CreateXDays {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        v.check(self.days >= 1, "days must be a positive number");
        v.finish()?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::XDays {
                start: self.start_date,
                every: self.days as u32,
            },
            Some(self.start_date),
            0,
        ))
    }
}

impl CreateEaster {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        check_yearly_advance(&mut v, self.advance_days);
        v.finish()?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Easter,
            Some(today),
            self.advance_days,
        ))
    }
}

impl CreateIrregular {
    pub fn build(&self, user_id: i64, today: NaiveDate) -> Result<Reminder, ApiError> {
        let mut v = Validator::new();
        check_description(&mut v, &self.description);
        check_month(&mut v, self.month);
        check_week_day(&mut v, self.week_day);
        v.check((1..=4).contains(&self.week), "week must be between 1 and 4");
        check_yearly_advance(&mut v, self.advance_days);
        v.finish()?;
        let month = Month::from_number(self.month).map_err(core_invalid)?;
        let weekday = Weekday::from_number(self.week_day).map_err(core_invalid)?;
        Ok(new_item(
            user_id,
            today,
            &self.description,
            &self.note,
            Frequency::Irregular {
                month,
                weekday,
                week_number: self.week as u8,
            },
            Some(self.start_date.unwrap_or(today)),
            self.advance_days,
        ))
    }
}

// Range checks run before conversion, so these are unreachable in practice.
fn core_invalid(err: tickler_core::CoreError) -> ApiError {
    ApiError::validation(vec![err.to_string()])
}

// ============================================================================
// Partial updates
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDaily {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWeekly {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub week_day: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMonthly {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub advance_days: Option<u32>,
    pub month_day: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateYearly {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub advance_days: Option<u32>,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOnce {
    pub description: Option<String>,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
    pub advance_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateXDays {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEaster {
    pub description: Option<String>,
    pub note: Option<String>,
    pub advance_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIrregular {
    pub description: Option<String>,
    pub note: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub advance_days: Option<u32>,
    pub month: Option<i64>,
    pub week_day: Option<i64>,
    pub week: Option<i64>,
}

fn apply_common(
    item: &mut Reminder,
    description: &Option<String>,
    note: &Option<String>,
) -> Result<(), ApiError> {
    if let Some(description) = description {
        let mut v = Validator::new();
        check_description(&mut v, description);
        v.finish()?;
        item.description = description.trim().to_string();
    }
    if let Some(note) = note {
        item.note = note.trim().to_string();
    }
    Ok(())
}

impl UpdateDaily {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Daily = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "daily",
            });
        };
        apply_common(item, &self.description, &self.note)?;
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        Ok(())
    }
}

impl UpdateWeekly {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Weekly { weekday } = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "weekly",
            });
        };
        if let Some(week_day) = self.week_day {
            let mut v = Validator::new();
            check_week_day(&mut v, week_day);
            v.finish()?;
        }
        apply_common(item, &self.description, &self.note)?;
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        let weekday = match self.week_day {
            Some(n) => Weekday::from_number(n).map_err(core_invalid)?,
            None => weekday,
        };
        item.frequency = Frequency::Weekly { weekday };
        Ok(())
    }
}

impl UpdateMonthly {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Monthly { month_day } = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "monthly",
            });
        };
        if let Some(day) = self.month_day {
            let mut v = Validator::new();
            v.check((1..=27).contains(&day), "month_day must be between 1 and 27");
            v.finish()?;
        }
        apply_common(item, &self.description, &self.note)?;
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        if let Some(advance_days) = self.advance_days {
            item.advance_days = advance_days;
        }
        item.frequency = Frequency::Monthly {
            month_day: self.month_day.map_or(month_day, |d| d as u8),
        };
        Ok(())
    }
}

impl UpdateYearly {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Yearly { month, day } = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "yearly",
            });
        };
        let mut v = Validator::new();
        if let Some(m) = self.month {
            check_month(&mut v, m);
        }
        if let Some(d) = self.day {
            v.check((1..=31).contains(&d), "day must be between 1 and 31");
        }
        v.finish()?;
        apply_common(item, &self.description, &self.note)?;
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        if let Some(advance_days) = self.advance_days {
            item.advance_days = advance_days;
        }
        let month = match self.month {
            Some(n) => Month::from_number(n).map_err(core_invalid)?,
            None => month,
        };
        item.frequency = Frequency::Yearly {
            month,
            day: self.day.map_or(day, |d| d as u8),
        };
        Ok(())
    }
}

impl UpdateOnce {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Once { date } = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "once",
            });
        };
        apply_common(item, &self.description, &self.note)?;
        if let Some(advance_days) = self.advance_days {
            item.advance_days = advance_days;
        }
        let date = self.date.unwrap_or(date);
        item.start_date = Some(date);
        item.frequency = Frequency::Once { date };
        Ok(())
    }
}

impl UpdateXDays {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::XDays { start, every } = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "xdays",
            });
        };
        if let Some(days) = self.days {
            let mut v = Validator::new();
            v.check(days >= 1, "days must be a positive number");
            v.finish()?;
        }
        apply_common(item, &self.description, &self.note)?;
        let start = self.start_date.unwrap_or(start);
        item.start_date = Some(start);
        item.frequency = Frequency::XDays {
            start,
            every: self.days.map_or(every, |d| d as u32),
        };
        Ok(())
    }
}

impl UpdateEaster {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Easter = item.frequency else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "easter",
            });
        };
        if let Some(advance_days) = self.advance_days {
            let mut v = Validator::new();
            check_yearly_advance(&mut v, advance_days);
            v.finish()?;
            item.advance_days = advance_days;
        }
        apply_common(item, &self.description, &self.note)
    }
}

impl UpdateIrregular {
    pub fn apply(&self, item: &mut Reminder) -> Result<(), ApiError> {
        let Frequency::Irregular {
            month,
            weekday,
            week_number,
        } = item.frequency
        else {
            return Err(ApiError::KindMismatch {
                id: item.id,
                expected: "irregular",
            });
        };
        let mut v = Validator::new();
        if let Some(m) = self.month {
            check_month(&mut v, m);
        }
        if let Some(d) = self.week_day {
            check_week_day(&mut v, d);
        }
        if let Some(w) = self.week {
            v.check((1..=4).contains(&w), "week must be between 1 and 4");
        }
        if let Some(advance_days) = self.advance_days {
            check_yearly_advance(&mut v, advance_days);
        }
        v.finish()?;
        apply_common(item, &self.description, &self.note)?;
        if let Some(start_date) = self.start_date {
            item.start_date = Some(start_date);
        }
        if let Some(advance_days) = self.advance_days {
            item.advance_days = advance_days;
        }
        let month = match self.month {
            Some(n) => Month::from_number(n).map_err(core_invalid)?,
            None => month,
        };
        let weekday = match self.week_day {
            Some(n) => Weekday::from_number(n).map_err(core_invalid)?,
            None => weekday,
        };
        item.frequency = Frequency::Irregular {
            month,
            weekday,
            week_number: self.week.map_or(week_number, |w| w as u8),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_defaults_note_and_start_date() {
        let req = CreateDaily {
            description: "stretch".to_string(),
            note: String::new(),
            start_date: None,
        };
        let item = req.build(1, date(2021, 5, 1)).unwrap();
        assert_eq!(item.id, Reminder::UNSAVED_ID);
        assert_eq!(item.start_date, Some(date(2021, 5, 1)));
        assert_eq!(item.frequency, Frequency::Daily);
        assert_eq!(item.advance_days, 0);
    }

    #[test]
    fn empty_description_is_rejected() {
        let req = CreateDaily {
            description: "   ".to_string(),
            note: String::new(),
            start_date: None,
        };
        assert!(req.build(1, date(2021, 5, 1)).is_err());
    }

    #[test]
    fn monthly_rejects_days_the_short_months_lack() {
        let mut req = CreateMonthly {
            description: "pay rent".to_string(),
            advance_days: 3,
            month_day: 28,
            note: String::new(),
            start_date: None,
        };
        assert!(req.build(1, date(2021, 5, 1)).is_err());
        req.month_day = 27;
        assert!(req.build(1, date(2021, 5, 1)).is_ok());
    }

    #[test]
    fn irregular_collects_all_range_errors() {
        let req = CreateIrregular {
            description: "meeting".to_string(),
            advance_days: 400,
            month: 13,
            week_day: 0,
            week: 5,
            note: String::new(),
            start_date: None,
        };
        let err = req.build(1, date(2021, 5, 1)).unwrap_err();
        let ApiError::Validation { messages } = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn irregular_accepts_the_full_documented_ranges() {
        // December and Saturday sit at the top of their ranges and must
        // pass.
        let req = CreateIrregular {
            description: "meeting".to_string(),
            advance_days: 10,
            month: 12,
            week_day: 7,
            week: 4,
            note: String::new(),
            start_date: None,
        };
        let item = req.build(1, date(2021, 5, 1)).unwrap();
        assert_eq!(
            item.frequency,
            Frequency::Irregular {
                month: Month::December,
                weekday: Weekday::Saturday,
                week_number: 4,
            }
        );
    }

    #[test]
    fn update_patches_only_the_provided_fields() {
        let create = CreateMonthly {
            description: "pay rent".to_string(),
            advance_days: 3,
            month_day: 5,
            note: "transfer".to_string(),
            start_date: None,
        };
        let mut item = create.build(1, date(2021, 5, 1)).unwrap();

        let update = UpdateMonthly {
            month_day: Some(7),
            ..Default::default()
        };
        update.apply(&mut item).unwrap();
        assert_eq!(item.frequency, Frequency::Monthly { month_day: 7 });
        assert_eq!(item.description, "pay rent");
        assert_eq!(item.note, "transfer");
        assert_eq!(item.advance_days, 3);
    }

    #[test]
    fn update_of_the_wrong_kind_is_rejected() {
        let mut item = CreateDaily {
            description: "stretch".to_string(),
            note: String::new(),
            start_date: None,
        }
        .build(1, date(2021, 5, 1))
        .unwrap();

        let update = UpdateMonthly {
            month_day: Some(7),
            ..Default::default()
        };
        let err = update.apply(&mut item).unwrap_err();
        assert!(matches!(err, ApiError::KindMismatch { .. }));
    }

    #[test]
    fn update_once_moves_both_the_date_and_the_anchor() {
        let mut item = CreateOnce {
            description: "renew passport".to_string(),
            date: date(2021, 9, 1),
            advance_days: 14,
            note: String::new(),
        }
        .build(1, date(2021, 5, 1))
        .unwrap();

        UpdateOnce {
            date: Some(date(2021, 10, 1)),
            ..Default::default()
        }
        .apply(&mut item)
        .unwrap();

        assert_eq!(
            item.frequency,
            Frequency::Once {
                date: date(2021, 10, 1)
            }
        );
        assert_eq!(item.start_date, Some(date(2021, 10, 1)));
    }
}
