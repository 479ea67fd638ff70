//! TaskFlow Storage - Persistence layer over redb
//!
//! One storage struct per entity, each owning its own table in a shared
//! embedded database. Values are JSON-encoded. Not-found is expressed as
//! `Option`/`bool` sentinels rather than errors.

pub mod category;
pub mod paths;
pub mod seed;
pub mod todo;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use category::CategoryStorage;
pub use todo::TodoStorage;

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub todos: TodoStorage,
    pub categories: CategoryStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);

        let todos = TodoStorage::new(db.clone())?;
        let categories = CategoryStorage::new(db.clone())?;

        Ok(Self {
            db,
            todos,
            categories,
        })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
