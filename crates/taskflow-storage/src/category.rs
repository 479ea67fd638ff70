//! Category storage.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use taskflow_models::Category;

const CATEGORY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("categories");

#[derive(Debug, Clone)]
pub struct CategoryStorage {
    db: Arc<Database>,
}

impl CategoryStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(CATEGORY_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn create(&self, category: &Category) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CATEGORY_TABLE)?;
            let json_bytes = serde_json::to_vec(category)?;
            table.insert(category.id.as_str(), json_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORY_TABLE)?;

        if let Some(value) = table.get(id)? {
            let category: Category = serde_json::from_slice(value.value())?;
            Ok(Some(category))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORY_TABLE)?;

        let mut categories = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            let category: Category = serde_json::from_slice(value.value())?;
            categories.push(category);
        }

        Ok(categories)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(CATEGORY_TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}
