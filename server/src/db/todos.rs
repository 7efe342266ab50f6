//! Database operations for the todos table.
//!
//! Every query is scoped by `user_id`; a todo owned by someone else behaves
//! exactly like a missing one.

use chrono::Utc;
use listsync_engine::{TaskData, TodoRecord};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// A stored todo row from the database.
#[derive(Debug, Clone)]
pub struct StoredTodo {
    pub id: String,
    pub text: String,
    pub is_complete: bool,
    pub created_at: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredTodo {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredTodo {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            is_complete: row.try_get("is_complete")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl StoredTodo {
    /// Convert a database row to the wire record.
    pub fn to_record(&self) -> TodoRecord {
        TodoRecord {
            id: self.id.clone(),
            text: self.text.clone(),
            is_complete: self.is_complete,
            created_at: self.created_at as u64,
        }
    }
}

/// Columns read back into [`StoredTodo`].
const COLUMNS: &str = "id, text, is_complete, created_at";

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// All todos of a user, newest first.
pub async fn list_todos(pool: &PgPool, user_id: &str) -> Result<Vec<StoredTodo>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM todos WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Insert a todo with a fresh id.
pub async fn insert_todo(
    pool: &PgPool,
    user_id: &str,
    data: &TaskData,
) -> Result<StoredTodo, sqlx::Error> {
    let now = now_millis();

    sqlx::query_as(&format!(
        r#"
        INSERT INTO todos (id, user_id, text, is_complete, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&data.text)
    .bind(data.is_complete)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Replace text and completion of a user's todo.
///
/// Returns `None` if the user has no todo with that id.
pub async fn update_todo(
    pool: &PgPool,
    user_id: &str,
    id: &str,
    data: &TaskData,
) -> Result<Option<StoredTodo>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE todos SET text = $3, is_complete = $4, updated_at = $5
        WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&data.text)
    .bind(data.is_complete)
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

/// Delete a user's todo. Returns whether a row was removed.
pub async fn delete_todo(pool: &PgPool, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_todo_to_record() {
        let stored = StoredTodo {
            id: "abc".into(),
            text: "Buy milk".into(),
            is_complete: true,
            created_at: 1_706_745_600_000,
        };

        let record = stored.to_record();
        assert_eq!(record.id, "abc");
        assert_eq!(record.text, "Buy milk");
        assert!(record.is_complete);
        assert_eq!(record.created_at, 1_706_745_600_000);
    }
}
