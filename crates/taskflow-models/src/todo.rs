//! Todo models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle status of a todo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, Default)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A single todo item
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub name: String,
    pub status: TodoStatus,
    pub category_id: String,
    #[ts(type = "string")]
    pub due_date: DateTime<Utc>,
}

impl Todo {
    pub fn new(
        name: impl Into<String>,
        status: TodoStatus,
        category_id: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            status,
            category_id: category_id.into(),
            due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TodoStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<TodoStatus>("\"pending\"").unwrap(),
            TodoStatus::Pending
        );
    }

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let todo = Todo::new(
            "Mow the Lawn",
            TodoStatus::Pending,
            "cat-1",
            "2025-10-10T00:00:00Z".parse().unwrap(),
        );

        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["categoryId"], "cat-1");
        assert_eq!(value["status"], "pending");
        assert!(value["dueDate"].is_string());
    }
}
