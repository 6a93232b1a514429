use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};

use crate::models::{List, ListWithTasks, Pagination, Task};

const LIST_COLUMNS: &str = "id, name, created_at, updated_at";

// One row per (list, task) pair; lists without tasks yield a single row of NULL task columns.
const LISTS_WITH_TASKS_SQL: &str = "
    SELECT l.id, l.name, l.created_at, l.updated_at,
           t.id AS task_id, t.text AS task_text, t.completed AS task_completed,
           t.is_important AS task_is_important, t.my_day AS task_my_day,
           t.due_date AS task_due_date, t.assigned_to AS task_assigned_to,
           t.created_at AS task_created_at, t.updated_at AS task_updated_at
    FROM lists l
    LEFT JOIN tasks t ON t.list_id = l.id";

#[derive(FromRow)]
struct ListTaskRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    task_id: Option<i32>,
    task_text: Option<String>,
    task_completed: Option<bool>,
    task_is_important: Option<bool>,
    task_my_day: Option<bool>,
    task_due_date: Option<DateTime<Utc>>,
    task_assigned_to: Option<String>,
    task_created_at: Option<DateTime<Utc>>,
    task_updated_at: Option<DateTime<Utc>>,
}

impl ListTaskRow {
    fn into_parts(self) -> (List, Option<Task>) {
        let task = match (
            self.task_id,
            self.task_text,
            self.task_completed,
            self.task_is_important,
            self.task_my_day,
            self.task_created_at,
        ) {
            (
                Some(id),
                Some(text),
                Some(completed),
                Some(is_important),
                Some(my_day),
                Some(created_at),
            ) => Some(Task {
                id,
                text,
                completed,
                is_important,
                my_day,
                due_date: self.task_due_date,
                assigned_to: self.task_assigned_to,
                list_id: self.id,
                created_at,
                updated_at: self.task_updated_at,
            }),
            _ => None,
        };

        let list = List {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (list, task)
    }
}

/// Folds joined rows, ordered by list id, into one entry per list.
fn group_rows(rows: Vec<ListTaskRow>) -> Vec<ListWithTasks> {
    let mut lists: Vec<ListWithTasks> = Vec::new();
    for row in rows {
        let (list, task) = row.into_parts();
        match lists.last_mut() {
            Some(current) if current.id == list.id => current.tasks.extend(task),
            _ => lists.push(ListWithTasks::new(list, task.into_iter().collect())),
        }
    }
    lists
}

pub async fn get_list(conn: &mut PgConnection, list_id: i32) -> Result<Option<List>, sqlx::Error> {
    sqlx::query_as::<_, List>(&format!("SELECT {} FROM lists WHERE id = $1", LIST_COLUMNS))
        .bind(list_id)
        .fetch_optional(conn)
        .await
}

pub async fn get_list_by_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<List>, sqlx::Error> {
    sqlx::query_as::<_, List>(&format!("SELECT {} FROM lists WHERE name = $1", LIST_COLUMNS))
        .bind(name)
        .fetch_optional(conn)
        .await
}

/// Plain paginated scan, without tasks.
pub async fn get_lists(
    conn: &mut PgConnection,
    page: Pagination,
) -> Result<Vec<List>, sqlx::Error> {
    sqlx::query_as::<_, List>(&format!(
        "SELECT {} FROM lists ORDER BY id OFFSET $1 LIMIT $2",
        LIST_COLUMNS
    ))
    .bind(page.skip.max(0))
    .bind(page.limit.max(0))
    .fetch_all(conn)
    .await
}

/// Every list with its tasks, fetched in a single joined query.
pub async fn get_lists_with_tasks(
    conn: &mut PgConnection,
) -> Result<Vec<ListWithTasks>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ListTaskRow>(&format!(
        "{} ORDER BY l.id, t.id",
        LISTS_WITH_TASKS_SQL
    ))
    .fetch_all(conn)
    .await?;

    Ok(group_rows(rows))
}

pub async fn get_list_with_tasks(
    conn: &mut PgConnection,
    list_id: i32,
) -> Result<Option<ListWithTasks>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ListTaskRow>(&format!(
        "{} WHERE l.id = $1 ORDER BY t.id",
        LISTS_WITH_TASKS_SQL
    ))
    .bind(list_id)
    .fetch_all(conn)
    .await?;

    Ok(group_rows(rows).into_iter().next())
}

pub async fn create_list(conn: &mut PgConnection, name: &str) -> Result<List, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let list = sqlx::query_as::<_, List>(&format!(
        "INSERT INTO lists (name) VALUES ($1) RETURNING {}",
        LIST_COLUMNS
    ))
    .bind(name)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    log::debug!("Created list {} ({:?})", list.id, list.name);
    Ok(list)
}

/// Deletes a list; its tasks go with it through the cascading foreign key.
pub async fn delete_list(
    conn: &mut PgConnection,
    list_id: i32,
) -> Result<Option<List>, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let deleted = sqlx::query_as::<_, List>(&format!(
        "DELETE FROM lists WHERE id = $1 RETURNING {}",
        LIST_COLUMNS
    ))
    .bind(list_id)
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    if deleted.is_some() {
        log::debug!("Deleted list {}", list_id);
    }
    Ok(deleted)
}
