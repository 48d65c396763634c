//! Response payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tickler_core::{EasterTable, Reminder, Result as CoreResult};

/// Wire view of a reminder: the stored fields plus the evaluated next
/// occurrence and visibility for the request's reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub id: i64,
    pub category: String,
    pub description: String,
    /// Human-readable rule label, e.g. "Mon" or "Every 3 days".
    pub frequency: String,
    pub next: NaiveDate,
    pub display: bool,
    pub note: String,
}

impl ReminderResponse {
    /// Evaluate an item against `today`, sharing `easter` across a batch.
    pub fn from_domain(
        item: &Reminder,
        today: NaiveDate,
        easter: &mut EasterTable,
    ) -> CoreResult<Self> {
        Ok(Self {
            id: item.id,
            category: item.category.to_string(),
            description: item.description.clone(),
            frequency: item.frequency.to_string(),
            next: item.next_occurrence_with(today, easter)?,
            display: item.should_display_with(today, easter)?,
            note: item.note.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tickler_core::{Category, Frequency, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn response_carries_the_evaluated_schedule() {
        let item = Reminder {
            id: 7,
            user_id: 1,
            description: "take out the bins".to_string(),
            note: "both carts".to_string(),
            category: Category::Task,
            frequency: Frequency::Weekly {
                weekday: Weekday::Tuesday,
            },
            date_added: date(2021, 5, 1),
            date_completed: None,
            start_date: Some(date(2021, 5, 1)),
            advance_days: 0,
        };

        // 2021-05-20 is a Thursday; the weekly rule looks back to the most
        // recent Tuesday, which reads as overdue and visible.
        let mut easter = EasterTable::new();
        let resp = ReminderResponse::from_domain(&item, date(2021, 5, 20), &mut easter).unwrap();
        assert_eq!(resp.next, date(2021, 5, 18));
        assert!(resp.display);
        assert_eq!(resp.frequency, "Tue");
        assert_eq!(resp.category, "task");
    }

    #[test]
    fn response_serializes_with_wire_field_names() {
        let resp = ReminderResponse {
            id: 3,
            category: "task".to_string(),
            description: "pay rent".to_string(),
            frequency: "Monthly, day 5".to_string(),
            next: date(2021, 6, 5),
            display: true,
            note: String::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["next"], "2021-06-05");
        assert_eq!(json["display"], true);
    }

    #[test]
    fn token_response_is_bearer() {
        let resp = TokenResponse::bearer("abc".to_string());
        assert_eq!(resp.token_type, "bearer");
    }
}
