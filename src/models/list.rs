use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::task::Task;

/// Payload for creating a list.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ListCreate {
    /// Must be between 1 and 100 characters and unique across all lists.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// A list as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct List {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the list is first modified.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A list together with every task it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithTasks {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ListWithTasks {
    pub fn new(list: List, tasks: Vec<Task>) -> Self {
        Self {
            id: list.id,
            name: list.name,
            created_at: list.created_at,
            updated_at: list.updated_at,
            tasks,
        }
    }
}

/// Offset/limit pagination for list scans.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
}

impl Pagination {
    fn default_limit() -> i64 {
        100
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::default_limit(),
        }
    }
}
