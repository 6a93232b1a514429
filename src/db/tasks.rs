use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};

use crate::models::{Patch, Task, TaskCreate, TaskQuery, TaskUpdate};

const TASK_COLUMNS: &str = "id, text, completed, is_important, my_day, due_date, assigned_to, \
                            list_id, created_at, updated_at";

pub async fn get_task(conn: &mut PgConnection, task_id: i32) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
        .bind(task_id)
        .fetch_optional(conn)
        .await
}

pub async fn get_tasks_by_list(
    conn: &mut PgConnection,
    list_id: i32,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE list_id = $1 ORDER BY id",
        TASK_COLUMNS
    ))
    .bind(list_id)
    .fetch_all(conn)
    .await
}

/// Smart view query. Each filter that is set adds an AND condition on an indexed column.
pub async fn query_tasks(
    conn: &mut PgConnection,
    filter: &TaskQuery,
) -> Result<Vec<Task>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM tasks WHERE TRUE", TASK_COLUMNS));

    if let Some(list_id) = filter.list_id {
        builder.push(" AND list_id = ").push_bind(list_id);
    }
    if let Some(completed) = filter.completed {
        builder.push(" AND completed = ").push_bind(completed);
    }
    if let Some(is_important) = filter.is_important {
        builder.push(" AND is_important = ").push_bind(is_important);
    }
    if let Some(my_day) = filter.my_day {
        builder.push(" AND my_day = ").push_bind(my_day);
    }
    if let Some(due_before) = filter.due_before {
        builder.push(" AND due_date < ").push_bind(due_before);
    }
    if let Some(due_after) = filter.due_after {
        builder.push(" AND due_date >= ").push_bind(due_after);
    }
    builder.push(" ORDER BY id");

    builder.build_query_as::<Task>().fetch_all(conn).await
}

pub async fn create_task(conn: &mut PgConnection, input: &TaskCreate) -> Result<Task, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (text, list_id, is_important, my_day)
         VALUES ($1, $2, $3, $4)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&input.text)
    .bind(input.list_id)
    .bind(input.is_important)
    .bind(input.my_day)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    log::debug!("Created task {} in list {}", task.id, task.list_id);
    Ok(task)
}

/// Applies the fields present in `changes` and stamps `updated_at`.
/// Fields left out of the payload keep their stored value.
pub async fn update_task(
    conn: &mut PgConnection,
    task_id: i32,
    changes: TaskUpdate,
) -> Result<Option<Task>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");

    if let Patch::Value(text) = changes.text {
        builder.push(", text = ").push_bind(text);
    }
    if let Patch::Value(completed) = changes.completed {
        builder.push(", completed = ").push_bind(completed);
    }
    if let Patch::Value(is_important) = changes.is_important {
        builder.push(", is_important = ").push_bind(is_important);
    }
    if let Patch::Value(my_day) = changes.my_day {
        builder.push(", my_day = ").push_bind(my_day);
    }
    if let Patch::Value(list_id) = changes.list_id {
        builder.push(", list_id = ").push_bind(list_id);
    }
    // Nullable columns: an explicit null clears them.
    if let Some(due_date) = changes.due_date.into_option() {
        builder.push(", due_date = ").push_bind(due_date);
    }
    if let Some(assigned_to) = changes.assigned_to.into_option() {
        builder.push(", assigned_to = ").push_bind(assigned_to);
    }

    builder
        .push(" WHERE id = ")
        .push_bind(task_id)
        .push(format!(" RETURNING {}", TASK_COLUMNS));

    let mut tx = conn.begin().await?;
    let updated = builder
        .build_query_as::<Task>()
        .fetch_optional(&mut *tx)
        .await?;
    tx.commit().await?;

    if updated.is_some() {
        log::debug!("Updated task {}", task_id);
    }
    Ok(updated)
}

pub async fn delete_task(
    conn: &mut PgConnection,
    task_id: i32,
) -> Result<Option<Task>, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let deleted = sqlx::query_as::<_, Task>(&format!(
        "DELETE FROM tasks WHERE id = $1 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    if deleted.is_some() {
        log::debug!("Deleted task {}", task_id);
    }
    Ok(deleted)
}
