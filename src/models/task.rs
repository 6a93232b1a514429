use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

use super::patch::Patch;
use super::timestamp::{deserialize_optional_timestamp, deserialize_patch_timestamp};

pub const TEXT_MAX_LEN: usize = 500;
pub const ASSIGNEE_MAX_LEN: usize = 100;

/// Input structure for creating a task.
/// `completed`, `dueDate` and `assignedTo` always start unset.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// The task text. Must be between 1 and 500 characters.
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    /// The list that will own the task. It must exist.
    pub list_id: i32,

    #[serde(rename = "isImportant", default)]
    pub is_important: bool,

    #[serde(rename = "myDay", default)]
    pub my_day: bool,
}

/// Sparse update of a task. Only the fields present in the request body change.
///
/// `dueDate` and `assignedTo` accept `null` to clear the stored value; every other
/// field rejects `null` during validation.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub text: Patch<String>,
    #[serde(default)]
    pub completed: Patch<bool>,
    #[serde(rename = "isImportant", default)]
    pub is_important: Patch<bool>,
    #[serde(rename = "myDay", default)]
    pub my_day: Patch<bool>,
    /// Any ISO-8601 date or date-time; naive values are read as UTC.
    #[serde(
        rename = "dueDate",
        default,
        deserialize_with = "deserialize_patch_timestamp"
    )]
    pub due_date: Patch<DateTime<Utc>>,
    #[serde(rename = "assignedTo", default)]
    pub assigned_to: Patch<String>,
    #[serde(default)]
    pub list_id: Patch<i32>,
}

impl TaskUpdate {
    /// True when the payload carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_missing()
            && self.completed.is_missing()
            && self.is_important.is_missing()
            && self.my_day.is_missing()
            && self.due_date.is_missing()
            && self.assigned_to.is_missing()
            && self.list_id.is_missing()
    }
}

impl Validate for TaskUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.text {
            Patch::Null => errors.add("text", not_nullable()),
            Patch::Value(text) => {
                let len = text.chars().count();
                if len == 0 || len > TEXT_MAX_LEN {
                    errors.add("text", length_error(1, TEXT_MAX_LEN));
                }
            }
            Patch::Missing => {}
        }

        if let Patch::Value(assignee) = &self.assigned_to {
            if assignee.chars().count() > ASSIGNEE_MAX_LEN {
                errors.add("assignedTo", length_error(0, ASSIGNEE_MAX_LEN));
            }
        }

        if self.completed.is_null() {
            errors.add("completed", not_nullable());
        }
        if self.is_important.is_null() {
            errors.add("isImportant", not_nullable());
        }
        if self.my_day.is_null() {
            errors.add("myDay", not_nullable());
        }
        if self.list_id.is_null() {
            errors.add("list_id", not_nullable());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn not_nullable() -> ValidationError {
    let mut error = ValidationError::new("null");
    error.message = Some(Cow::from("may be omitted but not set to null"));
    error
}

fn length_error(min: usize, max: usize) -> ValidationError {
    let mut error = ValidationError::new("length");
    error.add_param(Cow::from("min"), &min);
    error.add_param(Cow::from("max"), &max);
    error.message = Some(Cow::from(format!(
        "must be between {} and {} characters",
        min, max
    )));
    error
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "isImportant")]
    pub is_important: bool,
    /// Marks inclusion in the "My Day" smart view.
    #[serde(rename = "myDay")]
    pub my_day: bool,
    #[serde(rename = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
    /// Free-text assignee name.
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<String>,
    pub list_id: i32,
    pub created_at: DateTime<Utc>,
    /// `None` until the task is first updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Smart view filters for listing tasks across lists. All filters are optional and
/// combined with AND.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub list_id: Option<i32>,
    pub completed: Option<bool>,
    #[serde(rename = "isImportant")]
    pub is_important: Option<bool>,
    #[serde(rename = "myDay")]
    pub my_day: Option<bool>,
    /// Only tasks due strictly before this instant.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_before: Option<DateTime<Utc>>,
    /// Only tasks due at or after this instant.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_after: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_create_defaults() {
        let input: TaskCreate =
            serde_json::from_str(r#"{"text": "Buy milk", "list_id": 3, "myDay": true}"#).unwrap();

        assert_eq!(input.text, "Buy milk");
        assert_eq!(input.list_id, 3);
        assert!(input.my_day);
        assert!(!input.is_important);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_task_create_validation() {
        let empty = TaskCreate {
            text: "".to_string(),
            list_id: 1,
            is_important: false,
            my_day: false,
        };
        assert!(empty.validate().is_err());

        let too_long = TaskCreate {
            text: "a".repeat(TEXT_MAX_LEN + 1),
            list_id: 1,
            is_important: false,
            my_day: false,
        };
        let err = too_long.validate().unwrap_err();
        assert!(err.field_errors().contains_key("text"));
    }

    #[test]
    fn test_task_create_requires_list_id() {
        let result: Result<TaskCreate, _> = serde_json::from_str(r#"{"text": "Orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_update_tracks_presence() {
        let update: TaskUpdate = serde_json::from_str(r#"{"completed": true}"#).unwrap();

        assert_eq!(update.completed, Patch::Value(true));
        assert!(update.text.is_missing());
        assert!(update.is_important.is_missing());
        assert!(update.my_day.is_missing());
        assert!(update.due_date.is_missing());
        assert!(update.assigned_to.is_missing());
        assert!(update.list_id.is_missing());
        assert!(!update.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_task_update_explicit_false_is_a_value() {
        let update: TaskUpdate = serde_json::from_str(r#"{"isImportant": false}"#).unwrap();
        assert_eq!(update.is_important, Patch::Value(false));
    }

    #[test]
    fn test_task_update_clears_nullable_fields() {
        let update: TaskUpdate =
            serde_json::from_str(r#"{"dueDate": null, "assignedTo": null}"#).unwrap();

        assert!(update.due_date.is_null());
        assert!(update.assigned_to.is_null());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_task_update_rejects_null_for_required_fields() {
        let update: TaskUpdate =
            serde_json::from_str(r#"{"text": null, "completed": null, "list_id": null}"#)
                .unwrap();
        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("text"));
        assert!(fields.contains_key("completed"));
        assert!(fields.contains_key("list_id"));
    }

    #[test]
    fn test_task_update_length_limits() {
        let update: TaskUpdate = serde_json::from_value(serde_json::json!({
            "text": "",
            "assignedTo": "b".repeat(ASSIGNEE_MAX_LEN + 1),
        }))
        .unwrap();
        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("text"));
        assert!(fields.contains_key("assignedTo"));
    }

    #[test]
    fn test_task_update_due_date_forms() {
        let midnight = Utc.with_ymd_and_hms(2030, 5, 17, 0, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2030, 5, 17, 9, 30, 0).unwrap();

        for (raw, expected) in [
            ("2030-05-17", midnight),
            ("2030-05-17T09:30:00", morning),
            ("2030-05-17T09:30:00Z", morning),
        ] {
            let update: TaskUpdate =
                serde_json::from_value(serde_json::json!({ "dueDate": raw })).unwrap();
            assert_eq!(update.due_date, Patch::Value(expected), "{}", raw);
        }

        let update: TaskUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.due_date.is_missing());
        assert!(serde_json::from_str::<TaskUpdate>(r#"{"dueDate": "tomorrow"}"#).is_err());
    }

    #[test]
    fn test_task_query_due_bounds() {
        let query =
            actix_web::web::Query::<TaskQuery>::from_query("due_before=2030-05-17&myDay=true")
                .unwrap()
                .into_inner();

        assert_eq!(
            query.due_before,
            Some(Utc.with_ymd_and_hms(2030, 5, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(query.due_after, None);
        assert_eq!(query.my_day, Some(true));
    }

    #[test]
    fn test_empty_update() {
        let update: TaskUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_task_json_field_names() {
        let task = Task {
            id: 1,
            text: "Buy milk".into(),
            completed: false,
            is_important: true,
            my_day: true,
            due_date: None,
            assigned_to: Some("Sam".into()),
            list_id: 2,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["isImportant"], true);
        assert_eq!(json["myDay"], true);
        assert_eq!(json["assignedTo"], "Sam");
        assert_eq!(json["list_id"], 2);
        assert!(json["dueDate"].is_null());
        assert!(json.get("is_important").is_none());
    }
}
