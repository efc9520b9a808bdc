use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewTask, Task, TaskPatch};

const SELECT_TASK: &str =
    "SELECT id, title, description, priority, completed, created_at FROM tasks";

// Fixed width, so lexical order on the column is chronological order.
fn encode_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub async fn insert_task(db: &SqlitePool, new: NewTask) -> Result<Task, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().trunc_subsecs(6);

    sqlx::query(
        r#"
        INSERT INTO tasks
            (id, title, description, priority, completed, created_at)
        VALUES (?1, ?2, ?3, ?4, 0, ?5)
        "#,
    )
    .bind(&id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.priority.as_str())
    .bind(encode_timestamp(created_at))
    .execute(db)
    .await?;

    Ok(Task {
        id,
        title: new.title,
        description: new.description,
        priority: new.priority,
        completed: false,
        created_at,
    })
}

pub async fn fetch_tasks(db: &SqlitePool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "{} ORDER BY created_at DESC, rowid DESC",
        SELECT_TASK
    ))
    .fetch_all(db)
    .await
}

pub async fn find_task_by_id(db: &SqlitePool, id: &str) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("{} WHERE id = ?", SELECT_TASK))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Writes only the fields present in `patch`, in one statement, so a
/// concurrent update to other fields of the same row is never overwritten.
pub async fn update_task(
    db: &SqlitePool,
    id: &str,
    patch: TaskPatch,
) -> Result<Option<Task>, sqlx::Error> {
    let (set_description, description) = match patch.description {
        Some(description) => (true, description),
        None => (false, None),
    };

    sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET title = COALESCE(?1, title),
            description = CASE WHEN ?2 THEN ?3 ELSE description END,
            priority = COALESCE(?4, priority),
            completed = COALESCE(?5, completed)
        WHERE id = ?6
        RETURNING id, title, description, priority, completed, created_at
        "#,
    )
    .bind(patch.title)
    .bind(set_description)
    .bind(description)
    .bind(patch.priority.map(|p| p.as_str()))
    .bind(patch.completed)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete_task(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
