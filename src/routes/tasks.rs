use crate::{
    db,
    error::AppError,
    models::{Patch, TaskCreate, TaskQuery, TaskUpdate},
    routes::extractors::JsonBody,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found.".into())
}

fn list_not_found(list_id: i32) -> AppError {
    AppError::NotFound(format!("List with id {} not found.", list_id))
}

/// Smart view over all tasks.
///
/// ## Query Parameters (all optional, combined with AND):
/// - `list_id`: tasks of one list.
/// - `completed`, `isImportant`, `myDay`: `true` or `false`.
/// - `due_before`, `due_after`: ISO-8601 dates or date-times bounding `dueDate`.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task`, ordered by id.
/// - `422 Unprocessable Entity`: a filter could not be parsed.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let tasks = db::tasks::query_tasks(&mut conn, &query_params).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task in an existing list.
///
/// ## Request Body:
/// - `text`: 1 to 500 characters (required).
/// - `list_id`: id of the owning list (required).
/// - `isImportant`, `myDay`: optional, default `false`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with `completed` false and no due date or assignee.
/// - `404 Not Found`: `list_id` does not reference an existing list.
/// - `422 Unprocessable Entity`: the body is malformed or `text` has an invalid length.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: JsonBody<TaskCreate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut conn = pool.acquire().await?;
    if db::lists::get_list(&mut conn, task_data.list_id)
        .await?
        .is_none()
    {
        return Err(list_not_found(task_data.list_id));
    }

    let task = db::tasks::create_task(&mut conn, &task_data).await?;
    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = db::tasks::get_task(&mut conn, task_id.into_inner())
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// Only the keys present in the body are changed. `dueDate` and `assignedTo` may be
/// sent as `null` to clear them. Sending `list_id` moves the task to another list,
/// which must exist.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: the task, or the target list of a move, does not exist.
/// - `422 Unprocessable Entity`: the body is malformed, a field has an invalid length,
///   or a non-nullable field was sent as `null`.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: JsonBody<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();
    let changes = task_data.into_inner();

    let mut conn = pool.acquire().await?;
    if let Patch::Value(list_id) = &changes.list_id {
        if db::lists::get_list(&mut conn, *list_id).await?.is_none() {
            return Err(list_not_found(*list_id));
        }
    }

    let task = db::tasks::update_task(&mut conn, task_id, changes)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: the deleted `Task`.
/// - `404 Not Found`: no task has this id.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let deleted = db::tasks::delete_task(&mut conn, task_id.into_inner())
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(deleted))
}
