//! Reminder rows and the row <-> domain mapping.
//!
//! The store keeps one flat table: a frequency discriminator plus nullable
//! variant-specific columns. This module is the sole translation point
//! between that layout and the domain's rule variants. Unknown tags and
//! missing variant columns indicate storage corruption and fail loudly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tickler_core::{Category, Frequency, Month, Reminder, Weekday};

use crate::error::{DbError, DbResult};

/// Stored frequency discriminator tags, one per rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyKind {
    Daily,
    Easter,
    Irregular,
    Monthly,
    Once,
    Weekly,
    XDays,
    Yearly,
}

impl FrequencyKind {
    /// Stable tag stored in the `frequency` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Easter => "easter",
            Self::Irregular => "irregular",
            Self::Monthly => "monthly",
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::XDays => "xdays",
            Self::Yearly => "yearly",
        }
    }

    /// Parse a stored tag; unknown tags are not recoverable.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "daily" => Some(Self::Daily),
            "easter" => Some(Self::Easter),
            "irregular" => Some(Self::Irregular),
            "monthly" => Some(Self::Monthly),
            "once" => Some(Self::Once),
            "weekly" => Some(Self::Weekly),
            "xdays" => Some(Self::XDays),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Discriminator for a domain rule variant.
    pub fn of(frequency: &Frequency) -> Self {
        match frequency {
            Frequency::Daily => Self::Daily,
            Frequency::Easter => Self::Easter,
            Frequency::Irregular { .. } => Self::Irregular,
            Frequency::Monthly { .. } => Self::Monthly,
            Frequency::Once { .. } => Self::Once,
            Frequency::Weekly { .. } => Self::Weekly,
            Frequency::XDays { .. } => Self::XDays,
            Frequency::Yearly { .. } => Self::Yearly,
        }
    }
}

impl std::fmt::Display for FrequencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reminder as stored: flat columns, discriminator tag, nullable
/// variant fields.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ReminderRow {
    /// Row id; [`Reminder::UNSAVED_ID`] before the first insert
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Short description
    pub description: String,

    /// Free-form note
    pub note: String,

    /// Category tag ("task" or "reminder")
    pub category: String,

    /// Frequency discriminator tag
    pub frequency: String,

    /// Legacy column carried by the schema; never populated
    pub year: Option<i64>,

    /// Month number for Yearly/Irregular
    pub month: Option<i64>,

    /// Day-of-month for Monthly; also holds Yearly's day
    pub month_day: Option<i64>,

    /// Domain weekday number (Sunday=1) for Weekly/Irregular
    pub week_day: Option<i64>,

    /// Occurrence index within the month for Irregular
    pub week_number: Option<i64>,

    /// Interval length for XDays
    pub days: Option<i64>,

    /// Creation date
    pub date_added: NaiveDate,

    /// Date last marked done
    pub date_completed: Option<NaiveDate>,

    /// Lead time in days
    pub advance_days: i64,

    /// Anchor date; holds Once's date and XDays' phase anchor
    pub start_date: Option<NaiveDate>,
}

impl ReminderRow {
    /// Flatten a domain item into its stored representation.
    pub fn from_domain(item: &Reminder) -> Self {
        let kind = FrequencyKind::of(&item.frequency);

        let mut month = None;
        let mut month_day = None;
        let mut week_day = None;
        let mut week_number = None;
        let mut days = None;
        let mut start_date = item.start_date;

        match item.frequency {
            Frequency::Daily | Frequency::Easter => {}
            Frequency::Weekly { weekday } => {
                week_day = Some(i64::from(weekday.number()));
            }
            Frequency::Monthly { month_day: day } => {
                month_day = Some(i64::from(day));
            }
            Frequency::Yearly { month: m, day } => {
                month = Some(i64::from(m.number()));
                month_day = Some(i64::from(day));
            }
            Frequency::Once { date } => {
                start_date = Some(date);
            }
            Frequency::XDays { start, every } => {
                days = Some(i64::from(every));
                start_date = Some(start);
            }
            Frequency::Irregular {
                month: m,
                weekday,
                week_number: week,
            } => {
                month = Some(i64::from(m.number()));
                week_day = Some(i64::from(weekday.number()));
                week_number = Some(i64::from(week));
            }
        }

        Self {
            id: item.id,
            user_id: item.user_id,
            description: item.description.clone(),
            note: item.note.clone(),
            category: item.category.as_str().to_string(),
            frequency: kind.as_str().to_string(),
            year: None,
            month,
            month_day,
            week_day,
            week_number,
            days,
            date_added: item.date_added,
            date_completed: item.date_completed,
            advance_days: i64::from(item.advance_days),
            start_date,
        }
    }

    /// Rebuild the domain item this row represents.
    pub fn into_domain(self) -> DbResult<Reminder> {
        let kind = FrequencyKind::parse(&self.frequency)
            .ok_or_else(|| DbError::corrupt(self.id, format!("unknown frequency tag {:?}", self.frequency)))?;

        let frequency = match kind {
            FrequencyKind::Daily => Frequency::Daily,
            FrequencyKind::Easter => Frequency::Easter,
            FrequencyKind::Weekly => Frequency::Weekly {
                weekday: Weekday::from_number(self.require(self.week_day, "week_day")?)?,
            },
            FrequencyKind::Monthly => Frequency::Monthly {
                month_day: self.small_int(self.require(self.month_day, "month_day")?, "month_day")?,
            },
            FrequencyKind::Yearly => Frequency::Yearly {
                month: Month::from_number(self.require(self.month, "month")?)?,
                day: self.small_int(self.require(self.month_day, "month_day")?, "month_day")?,
            },
            FrequencyKind::Once => Frequency::Once {
                date: self.require(self.start_date, "start_date")?,
            },
            FrequencyKind::XDays => {
                let every = self.require(self.days, "days")?;
                if every <= 0 {
                    return Err(DbError::corrupt(self.id, format!("non-positive days: {every}")));
                }
                Frequency::XDays {
                    start: self.require(self.start_date, "start_date")?,
                    every: every as u32,
                }
            }
            FrequencyKind::Irregular => Frequency::Irregular {
                month: Month::from_number(self.require(self.month, "month")?)?,
                weekday: Weekday::from_number(self.require(self.week_day, "week_day")?)?,
                week_number: self.small_int(self.require(self.week_number, "week_number")?, "week_number")?,
            },
        };

        let category: Category = self
            .category
            .parse()
            .map_err(|_| DbError::corrupt(self.id, format!("unknown category {:?}", self.category)))?;

        if self.advance_days < 0 {
            return Err(DbError::corrupt(
                self.id,
                format!("negative advance_days: {}", self.advance_days),
            ));
        }

        Ok(Reminder {
            id: self.id,
            user_id: self.user_id,
            description: self.description,
            note: self.note,
            category,
            frequency,
            date_added: self.date_added,
            date_completed: self.date_completed,
            start_date: self.start_date,
            advance_days: self.advance_days as u32,
        })
    }

    fn require<T>(&self, value: Option<T>, column: &str) -> DbResult<T> {
        value.ok_or_else(|| {
            DbError::corrupt(
                self.id,
                format!("{} record with null {column}", self.frequency),
            )
        })
    }

    fn small_int(&self, value: i64, column: &str) -> DbResult<u8> {
        u8::try_from(value)
            .map_err(|_| DbError::corrupt(self.id, format!("{column} out of range: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(frequency: Frequency) -> Reminder {
        let start_date = match frequency {
            Frequency::Once { date } => Some(date),
            Frequency::XDays { start, .. } => Some(start),
            _ => Some(date(2021, 1, 1)),
        };
        Reminder {
            id: 7,
            user_id: 3,
            description: "water the plants".to_string(),
            note: "the ficus needs less".to_string(),
            category: Category::Task,
            frequency,
            date_added: date(2021, 1, 1),
            date_completed: Some(date(2021, 3, 1)),
            start_date,
            advance_days: 4,
        }
    }

    fn all_variants() -> Vec<Frequency> {
        vec![
            Frequency::Daily,
            Frequency::Weekly {
                weekday: Weekday::Thursday,
            },
            Frequency::Monthly { month_day: 12 },
            Frequency::Yearly {
                month: Month::July,
                day: 4,
            },
            Frequency::Once {
                date: date(2021, 9, 30),
            },
            Frequency::XDays {
                start: date(2020, 6, 1),
                every: 10,
            },
            Frequency::Easter,
            Frequency::Irregular {
                month: Month::November,
                weekday: Weekday::Thursday,
                week_number: 4,
            },
        ]
    }

    #[test]
    fn row_round_trips_for_every_variant() {
        for frequency in all_variants() {
            let original = item(frequency);
            let row = ReminderRow::from_domain(&original);
            let rebuilt = row.clone().into_domain().unwrap();
            assert_eq!(rebuilt, original);
            assert_eq!(ReminderRow::from_domain(&rebuilt), row);
        }
    }

    #[test]
    fn yearly_persists_its_day_in_month_day() {
        let row = ReminderRow::from_domain(&item(Frequency::Yearly {
            month: Month::July,
            day: 4,
        }));
        assert_eq!(row.month, Some(7));
        assert_eq!(row.month_day, Some(4));
        assert_eq!(row.week_day, None);
    }

    #[test]
    fn once_persists_its_date_in_start_date() {
        let row = ReminderRow::from_domain(&item(Frequency::Once {
            date: date(2021, 9, 30),
        }));
        assert_eq!(row.start_date, Some(date(2021, 9, 30)));
        assert_eq!(row.days, None);
    }

    #[test]
    fn unknown_frequency_tag_is_fatal() {
        let mut row = ReminderRow::from_domain(&item(Frequency::Daily));
        row.frequency = "fortnightly".to_string();
        let err = row.into_domain().unwrap_err();
        assert!(matches!(err, DbError::Corrupt { .. }));
    }

    #[test]
    fn missing_variant_column_is_fatal() {
        let mut row = ReminderRow::from_domain(&item(Frequency::Monthly { month_day: 12 }));
        row.month_day = None;
        let err = row.into_domain().unwrap_err();
        assert!(matches!(err, DbError::Corrupt { .. }));

        let mut row = ReminderRow::from_domain(&item(Frequency::XDays {
            start: date(2020, 6, 1),
            every: 10,
        }));
        row.start_date = None;
        assert!(matches!(row.into_domain().unwrap_err(), DbError::Corrupt { .. }));
    }

    #[test]
    fn out_of_range_variant_column_is_fatal() {
        let mut row = ReminderRow::from_domain(&item(Frequency::Weekly {
            weekday: Weekday::Thursday,
        }));
        row.week_day = Some(9);
        assert!(row.into_domain().is_err());
    }
}
