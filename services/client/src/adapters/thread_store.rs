//! services/client/src/adapters/thread_store.rs
//!
//! Durable client-side key store holding the chat thread identifier.
//! The file is a flat JSON object so other keys can live next to `chatThreadId`.

use async_trait::async_trait;
use portfolio_core::domain::ThreadId;
use portfolio_core::ports::{PortError, PortResult, ThreadStore};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const THREAD_KEY: &str = "chatThreadId";

/// A `ThreadStore` backed by a JSON file. Entries never expire.
#[derive(Clone, Debug)]
pub struct FileThreadStore {
    path: PathBuf,
}

impl FileThreadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> PortResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(PortError::Unexpected(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(PortError::Malformed(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(PortError::Malformed(e.to_string())),
        }
    }
}

#[async_trait]
impl ThreadStore for FileThreadStore {
    async fn load_thread(&self) -> PortResult<Option<ThreadId>> {
        let entries = self.read_entries().await?;
        Ok(entries
            .get(THREAD_KEY)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(|id| ThreadId(id.to_string())))
    }

    async fn save_thread(&self, thread: &ThreadId) -> PortResult<()> {
        // A corrupt file is replaced rather than blocking the new thread.
        let mut entries = self.read_entries().await.unwrap_or_default();
        entries.insert(THREAD_KEY.to_string(), Value::String(thread.0.clone()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        fs::write(&self.path, body)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
