use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only access to the document holding the allow-list.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `Ok(None)` when no document exists at `path`.
    async fn get_document(&self, path: &str) -> Result<Option<Value>>;
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
