use std::sync::Arc;
use taskflow_ai::ChatClient;
use taskflow_storage::Storage;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub chat: Arc<dyn ChatClient>,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, chat: Arc<dyn ChatClient>) -> Self {
        Self { storage, chat }
    }
}
