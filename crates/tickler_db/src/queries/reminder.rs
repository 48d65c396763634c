//! Reminder queries.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use tickler_core::Reminder;

use crate::error::DbResult;
use crate::models::ReminderRow;

const REMINDER_COLUMNS: &str = r#"
    id, user_id, description, note, category, frequency,
    year, month, month_day, week_day, week_number, days,
    date_added, date_completed, advance_days, start_date
"#;

// ============================================================================
// Reminder CRUD
// ============================================================================

/// Insert a new reminder and return it with its assigned id.
pub async fn create_reminder(pool: &SqlitePool, item: &Reminder) -> DbResult<Reminder> {
    let row = ReminderRow::from_domain(item);
    let result = sqlx::query(
        r#"
        INSERT INTO reminders (
            user_id, description, note, category, frequency,
            year, month, month_day, week_day, week_number, days,
            date_added, date_completed, advance_days, start_date
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(row.user_id)
    .bind(&row.description)
    .bind(&row.note)
    .bind(&row.category)
    .bind(&row.frequency)
    .bind(row.year)
    .bind(row.month)
    .bind(row.month_day)
    .bind(row.week_day)
    .bind(row.week_number)
    .bind(row.days)
    .bind(row.date_added)
    .bind(row.date_completed)
    .bind(row.advance_days)
    .bind(row.start_date)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(reminder_id = id, user_id = item.user_id, "created reminder");

    Ok(Reminder {
        id,
        ..item.clone()
    })
}

/// Get a reminder by id, scoped to its owner.
pub async fn get_reminder(pool: &SqlitePool, user_id: i64, id: i64) -> DbResult<Option<Reminder>> {
    let row = sqlx::query_as::<_, ReminderRow>(&format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ? AND id = ?"
    ))
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(ReminderRow::into_domain).transpose()
}

/// List all of a user's reminders.
pub async fn list_reminders(pool: &SqlitePool, user_id: i64) -> DbResult<Vec<Reminder>> {
    let rows = sqlx::query_as::<_, ReminderRow>(&format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ? ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ReminderRow::into_domain).collect()
}

/// Overwrite a reminder's mutable fields. Identity and ownership never
/// change; returns false when the row doesn't exist for this user.
pub async fn update_reminder(pool: &SqlitePool, item: &Reminder) -> DbResult<bool> {
    let row = ReminderRow::from_domain(item);
    let result = sqlx::query(
        r#"
        UPDATE reminders
        SET description = ?, note = ?, category = ?, frequency = ?,
            year = ?, month = ?, month_day = ?, week_day = ?, week_number = ?, days = ?,
            date_completed = ?, advance_days = ?, start_date = ?
        WHERE user_id = ? AND id = ?
        "#,
    )
    .bind(&row.description)
    .bind(&row.note)
    .bind(&row.category)
    .bind(&row.frequency)
    .bind(row.year)
    .bind(row.month)
    .bind(row.month_day)
    .bind(row.week_day)
    .bind(row.week_number)
    .bind(row.days)
    .bind(row.date_completed)
    .bind(row.advance_days)
    .bind(row.start_date)
    .bind(row.user_id)
    .bind(row.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Stamp a reminder's completion date.
pub async fn mark_completed(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    today: NaiveDate,
) -> DbResult<bool> {
    let result = sqlx::query("UPDATE reminders SET date_completed = ? WHERE user_id = ? AND id = ?")
        .bind(today)
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a reminder.
pub async fn delete_reminder(pool: &SqlitePool, user_id: i64, id: i64) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM reminders WHERE user_id = ? AND id = ?")
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
