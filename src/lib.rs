#![doc = "The `taskify` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence, request contracts, routing, error handling and the"]
#![doc = "authentication primitives of the Taskify to-do backend. The binary (`main.rs`)"]
#![doc = "reads the configuration, builds the pool and serves `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use actix_cors::Cors;

pub use crate::config::Config;
pub use crate::error::AppError;

/// Development CORS posture: every origin, method and header is allowed.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
