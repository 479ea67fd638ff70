//! Todo storage.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use taskflow_models::{Todo, TodoStatus};

const TODO_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("todos");

#[derive(Debug, Clone)]
pub struct TodoStorage {
    db: Arc<Database>,
}

impl TodoStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TODO_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn create(&self, todo: &Todo) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TODO_TABLE)?;
            let json_bytes = serde_json::to_vec(todo)?;
            table.insert(todo.id.as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Todo>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TODO_TABLE)?;

        if let Some(value) = table.get(id)? {
            let todo: Todo = serde_json::from_slice(value.value())?;
            Ok(Some(todo))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Todo>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TODO_TABLE)?;

        let mut todos = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            let todo: Todo = serde_json::from_slice(value.value())?;
            todos.push(todo);
        }

        Ok(todos)
    }

    /// Overwrite an existing todo. The caller is expected to have loaded it
    /// via `get` first.
    pub fn update(&self, todo: &Todo) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TODO_TABLE)?;
            let json_bytes = serde_json::to_vec(todo)?;
            table.insert(todo.id.as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(TODO_TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Remove every completed todo, returning how many were deleted.
    pub fn clear_completed(&self) -> Result<usize> {
        let completed: Vec<String> = self
            .list()?
            .into_iter()
            .filter(|todo| todo.status == TodoStatus::Completed)
            .map(|todo| todo.id)
            .collect();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TODO_TABLE)?;
            for id in &completed {
                table.remove(id.as_str())?;
            }
        }
        write_txn.commit()?;

        Ok(completed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_storage() -> (TodoStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        (TodoStorage::new(db).unwrap(), temp_dir)
    }

    fn sample_todo(name: &str, status: TodoStatus) -> Todo {
        Todo::new(
            name,
            status,
            "cat-1",
            "2025-10-10T00:00:00Z".parse().unwrap(),
        )
    }

    #[test]
    fn create_and_get_roundtrip() {
        let (storage, _dir) = test_storage();
        let todo = sample_todo("Mow the Lawn", TodoStatus::Pending);

        storage.create(&todo).unwrap();

        let loaded = storage.get(&todo.id).unwrap();
        assert_eq!(loaded, Some(todo));
    }

    #[test]
    fn get_missing_returns_none() {
        let (storage, _dir) = test_storage();
        assert!(storage.get("nope").unwrap().is_none());
    }

    #[test]
    fn update_overwrites_fields() {
        let (storage, _dir) = test_storage();
        let mut todo = sample_todo("Homework", TodoStatus::Pending);
        storage.create(&todo).unwrap();

        todo.status = TodoStatus::Completed;
        storage.update(&todo).unwrap();

        let loaded = storage.get(&todo.id).unwrap().unwrap();
        assert_eq!(loaded.status, TodoStatus::Completed);
    }

    #[test]
    fn delete_reports_whether_todo_existed() {
        let (storage, _dir) = test_storage();
        let todo = sample_todo("Homework", TodoStatus::Pending);
        storage.create(&todo).unwrap();

        assert!(storage.delete(&todo.id).unwrap());
        assert!(!storage.delete(&todo.id).unwrap());
    }

    #[test]
    fn clear_completed_removes_only_completed_todos() {
        let (storage, _dir) = test_storage();
        storage
            .create(&sample_todo("done 1", TodoStatus::Completed))
            .unwrap();
        storage
            .create(&sample_todo("done 2", TodoStatus::Completed))
            .unwrap();
        storage
            .create(&sample_todo("still open", TodoStatus::InProgress))
            .unwrap();

        let deleted = storage.clear_completed().unwrap();
        assert_eq!(deleted, 2);

        let remaining = storage.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "still open");
    }
}
