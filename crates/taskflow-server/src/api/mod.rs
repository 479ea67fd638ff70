pub mod categories;
pub mod chat;
pub mod error;
pub mod state;
pub mod todos;

pub use error::ApiError;
pub use state::AppState;

#[cfg(test)]
pub mod test_support {
    use super::state::AppState;
    use std::sync::Arc;
    use taskflow_ai::MockChatClient;
    use taskflow_storage::Storage;
    use tempfile::TempDir;

    pub fn create_test_state() -> (AppState, TempDir) {
        create_test_state_with(MockChatClient::new("mock-model"))
    }

    pub fn create_test_state_with(chat: MockChatClient) -> (AppState, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Arc::new(Storage::new(db_path.to_str().unwrap()).unwrap());
        (AppState::new(storage, Arc::new(chat)), temp_dir)
    }
}
