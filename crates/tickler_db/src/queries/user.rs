//! User account queries.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;

/// Create a user account. The username must be unique.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> DbResult<UserRow> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, active, password_hash)
        VALUES (?, ?, 1, ?)
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::AlreadyExists {
            entity: "user",
            key: username.to_string(),
        },
        _ => DbError::Sqlx(e),
    })?;

    let id = result.last_insert_rowid();
    debug!(user_id = id, username, "created user");

    Ok(UserRow {
        id,
        username: username.to_string(),
        email: email.to_string(),
        active: true,
        password_hash: password_hash.to_string(),
    })
}

/// Look up a user by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> DbResult<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, active, password_hash
        FROM users WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Look up a user by id.
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> DbResult<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, active, password_hash
        FROM users WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::TicklerDb;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = TicklerDb::open_in_memory().await.unwrap();

        let created = create_user(db.pool(), "ada", "ada@example.com", "hash")
            .await
            .unwrap();
        assert!(created.id > 0);
        assert!(created.active);

        let fetched = get_user_by_username(db.pool(), "ada").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.email, "ada@example.com");

        assert!(get_user_by_username(db.pool(), "grace").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = TicklerDb::open_in_memory().await.unwrap();

        create_user(db.pool(), "ada", "ada@example.com", "hash")
            .await
            .unwrap();
        let err = create_user(db.pool(), "ada", "other@example.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists { .. }));
    }
}
