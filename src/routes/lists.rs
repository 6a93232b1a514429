use crate::{
    db,
    error::AppError,
    models::ListCreate,
    routes::extractors::JsonBody,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

fn list_not_found() -> AppError {
    AppError::NotFound("List not found.".into())
}

/// Creates a new list.
///
/// ## Request Body:
/// - `name`: 1 to 100 characters, unique across all lists.
///
/// ## Responses:
/// - `201 Created`: the new `List`.
/// - `400 Bad Request`: a list with this name already exists.
/// - `422 Unprocessable Entity`: the body is malformed or `name` has an invalid length.
#[post("")]
pub async fn create_list(
    pool: web::Data<PgPool>,
    list_data: JsonBody<ListCreate>,
) -> Result<impl Responder, AppError> {
    list_data.validate()?;

    let mut conn = pool.acquire().await?;
    if db::lists::get_list_by_name(&mut conn, &list_data.name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "A list with this name already exists.".into(),
        ));
    }

    let list = db::lists::create_list(&mut conn, &list_data.name).await?;
    log::info!("List {} created", list.id);

    Ok(HttpResponse::Created().json(list))
}

/// Retrieves every list with its tasks nested. This is what clients load on start-up.
#[get("")]
pub async fn get_lists(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let lists = db::lists::get_lists_with_tasks(&mut conn).await?;

    Ok(HttpResponse::Ok().json(lists))
}

/// Retrieves a single list with its tasks.
///
/// ## Responses:
/// - `200 OK`: the `ListWithTasks`.
/// - `404 Not Found`: no list has this id.
#[get("/{id}")]
pub async fn get_list(
    pool: web::Data<PgPool>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = db::lists::get_list_with_tasks(&mut conn, list_id.into_inner())
        .await?
        .ok_or_else(list_not_found)?;

    Ok(HttpResponse::Ok().json(list))
}

/// Retrieves the tasks of one list, without the list itself.
#[get("/{id}/tasks")]
pub async fn get_list_tasks(
    pool: web::Data<PgPool>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let list_id = list_id.into_inner();
    let mut conn = pool.acquire().await?;
    db::lists::get_list(&mut conn, list_id)
        .await?
        .ok_or_else(list_not_found)?;

    let tasks = db::tasks::get_tasks_by_list(&mut conn, list_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Deletes a list and, through the cascade, every task it owns.
///
/// ## Responses:
/// - `200 OK`: the deleted `List`.
/// - `404 Not Found`: no list has this id.
#[delete("/{id}")]
pub async fn delete_list(
    pool: web::Data<PgPool>,
    list_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let deleted = db::lists::delete_list(&mut conn, list_id.into_inner())
        .await?
        .ok_or_else(list_not_found)?;
    log::info!("List {} deleted", deleted.id);

    Ok(HttpResponse::Ok().json(deleted))
}
