pub mod extractors;
pub mod health;
pub mod lists;
pub mod tasks;

use actix_web::{error, web};

use crate::error::AppError;

/// Registers every route plus the extractor settings that turn malformed bodies,
/// query strings and path segments into `AppError::ValidationError`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(health::root)
        .service(health::health)
        .service(
            web::scope("/lists")
                .service(lists::create_list)
                .service(lists::get_lists)
                .service(lists::get_list)
                .service(lists::get_list_tasks)
                .service(lists::delete_list),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid request body: {}", other),
        };
        AppError::ValidationError(message).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query string: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path parameter: {}", err)).into()
    })
}
