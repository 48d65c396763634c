//! Reminder items and the visibility policy.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::EasterTable;
use crate::error::{CoreError, Result};
use crate::frequency::Frequency;

/// Whether an item is an actionable task or a passive reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Task,
    Reminder,
}

impl Category {
    /// Stable tag used in storage and over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Reminder => "reminder",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "task" => Ok(Self::Task),
            "reminder" => Ok(Self::Reminder),
            other => Err(CoreError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring or one-time reminder owned by a user.
///
/// Identity is `(id, user_id)`. "Done" is recorded by stamping
/// `date_completed`, not a status flag: completion is reinterpreted on each
/// evaluation against the freshly computed next occurrence, so a stale
/// completion stops suppressing display once the cycle rolls over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Row id once persisted; [`Reminder::UNSAVED_ID`] before that.
    pub id: i64,

    /// Owning user.
    pub user_id: i64,

    /// Short, non-empty description.
    pub description: String,

    /// Free-form note, possibly empty.
    pub note: String,

    /// Task vs. reminder.
    pub category: Category,

    /// Recurrence rule.
    pub frequency: Frequency,

    /// Date the record was created.
    pub date_added: NaiveDate,

    /// Date last marked done, if ever.
    pub date_completed: Option<NaiveDate>,

    /// Rule-specific anchor date (XDays phase anchor, Once date).
    pub start_date: Option<NaiveDate>,

    /// Days before the due date that the item starts being surfaced.
    pub advance_days: u32,
}

impl Reminder {
    /// Sentinel id for an item that hasn't been persisted yet.
    pub const UNSAVED_ID: i64 = -1;

    /// Whether the item has a persisted identity.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Next date this item is due, evaluated against an explicit reference
    /// date.
    pub fn next_occurrence(&self, today: NaiveDate) -> Result<NaiveDate> {
        self.frequency.next_occurrence(today, self.advance_days)
    }

    /// As [`next_occurrence`](Self::next_occurrence) with a shared
    /// [`EasterTable`].
    pub fn next_occurrence_with(
        &self,
        today: NaiveDate,
        easter: &mut EasterTable,
    ) -> Result<NaiveDate> {
        self.frequency
            .next_occurrence_with(today, self.advance_days, easter)
    }

    /// Whether the item should currently be surfaced.
    ///
    /// The lead window opens `advance_days` before the next occurrence. A
    /// completion stamped inside the current window suppresses display; once
    /// the next cycle's window opens it no longer counts.
    pub fn should_display(&self, today: NaiveDate) -> Result<bool> {
        self.should_display_with(today, &mut EasterTable::new())
    }

    /// As [`should_display`](Self::should_display) with a shared
    /// [`EasterTable`].
    pub fn should_display_with(
        &self,
        today: NaiveDate,
        easter: &mut EasterTable,
    ) -> Result<bool> {
        let next = self.next_occurrence_with(today, easter)?;
        let threshold = next - Duration::days(i64::from(self.advance_days));
        if let Some(completed) = self.date_completed {
            if completed >= threshold {
                return Ok(false);
            }
        }
        Ok(today >= threshold)
    }

    /// Signed number of days from `today` to the next occurrence.
    pub fn days_until(&self, today: NaiveDate) -> Result<i64> {
        Ok((self.next_occurrence(today)? - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_item(month_day: u8, advance_days: u32) -> Reminder {
        Reminder {
            id: 1,
            user_id: 1,
            description: "pay rent".to_string(),
            note: String::new(),
            category: Category::Task,
            frequency: Frequency::Monthly { month_day },
            date_added: date(2021, 1, 1),
            date_completed: None,
            start_date: Some(date(2021, 1, 1)),
            advance_days,
        }
    }

    #[test]
    fn visible_inside_the_lead_window() {
        let item = monthly_item(10, 3);
        assert!(!item.should_display(date(2021, 6, 1)).unwrap());
        // Window opens three days before June 10.
        assert!(item.should_display(date(2021, 6, 7)).unwrap());
        assert!(item.should_display(date(2021, 6, 10)).unwrap());
    }

    #[test]
    fn completion_suppresses_until_the_next_window() {
        let mut item = monthly_item(10, 3);
        item.date_completed = Some(date(2021, 5, 10));

        // Still inside May's window: suppressed.
        assert!(!item.should_display(date(2021, 5, 12)).unwrap());
        // June's window reopens even though date_completed is still set.
        assert!(item.should_display(date(2021, 6, 8)).unwrap());
    }

    #[test]
    fn overdue_items_stay_visible() {
        let item = monthly_item(10, 0);
        // Past the due date with no completion: the rule still points at
        // June 10, so the item reads as overdue and visible.
        assert!(item.should_display(date(2021, 6, 20)).unwrap());
    }

    #[test]
    fn days_until_counts_from_the_reference_date() {
        let item = monthly_item(10, 0);
        assert_eq!(item.days_until(date(2021, 6, 1)).unwrap(), 9);
        assert_eq!(item.days_until(date(2021, 6, 10)).unwrap(), 0);
    }

    #[test]
    fn unsaved_sentinel() {
        let mut item = monthly_item(10, 0);
        assert!(item.is_persisted());
        item.id = Reminder::UNSAVED_ID;
        assert!(!item.is_persisted());
    }

    #[test]
    fn category_tags_round_trip() {
        for category in [Category::Task, Category::Reminder] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("birthday".parse::<Category>().is_err());
    }
}
