//! Path utilities for TaskFlow directory resolution.

use anyhow::Result;
use std::path::PathBuf;

const TASKFLOW_DIR: &str = ".taskflow";
const DATABASE_FILE: &str = "taskflow.redb";

/// Environment variable to override the TaskFlow directory.
const TASKFLOW_DIR_ENV: &str = "TASKFLOW_DIR";

/// Resolve the TaskFlow data directory.
/// Priority: TASKFLOW_DIR env var > ~/.taskflow/
pub fn resolve_taskflow_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(TASKFLOW_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(TASKFLOW_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the TaskFlow directory exists and return its path.
pub fn ensure_taskflow_dir() -> Result<PathBuf> {
    let dir = resolve_taskflow_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Ensure the data directory exists and return the database path as a string.
pub fn ensure_database_path_string() -> Result<String> {
    let path = ensure_taskflow_dir()?.join(DATABASE_FILE);
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Database path is not valid UTF-8"))
}
