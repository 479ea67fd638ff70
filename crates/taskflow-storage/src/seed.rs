//! Demo seed data.

use crate::Storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use taskflow_models::{Category, Todo, TodoStatus};
use tracing::info;

fn due(date: &str) -> DateTime<Utc> {
    date.parse().expect("valid seed date")
}

/// Populate the store with demo data when it is completely empty.
/// Safe to call on every startup.
pub fn ensure_seed_data(storage: &Storage) -> Result<()> {
    if !storage.todos.list()?.is_empty() || !storage.categories.list()?.is_empty() {
        return Ok(());
    }

    let school = Category::new("School");
    let personal = Category::new("Personal");
    storage.categories.create(&school)?;
    storage.categories.create(&personal)?;

    storage.todos.create(&Todo::new(
        "Mow the Lawn",
        TodoStatus::Pending,
        school.id.as_str(),
        due("2025-10-10T00:00:00Z"),
    ))?;
    storage.todos.create(&Todo::new(
        "Finish my homework",
        TodoStatus::InProgress,
        school.id.as_str(),
        due("2025-10-08T00:00:00Z"),
    ))?;
    storage.todos.create(&Todo::new(
        "Watch class video",
        TodoStatus::Completed,
        school.id.as_str(),
        due("2025-10-03T00:00:00Z"),
    ))?;

    info!("Seed data initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn seeds_empty_store_once() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Storage::new(db_path.to_str().unwrap()).unwrap();

        ensure_seed_data(&storage).unwrap();
        assert_eq!(storage.categories.list().unwrap().len(), 2);
        assert_eq!(storage.todos.list().unwrap().len(), 3);

        // A second call must not duplicate anything.
        ensure_seed_data(&storage).unwrap();
        assert_eq!(storage.categories.list().unwrap().len(), 2);
        assert_eq!(storage.todos.list().unwrap().len(), 3);
    }

    #[test]
    fn does_not_seed_a_store_with_existing_data() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Storage::new(db_path.to_str().unwrap()).unwrap();

        let category = Category::new("Work");
        storage.categories.create(&category).unwrap();

        ensure_seed_data(&storage).unwrap();
        assert_eq!(storage.categories.list().unwrap().len(), 1);
        assert!(storage.todos.list().unwrap().is_empty());
    }
}
