use crate::adapters::{document_key, parse_document};
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads documents as JSON files below a base directory.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    base_path: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get_document(&self, path: &str) -> Result<Option<Value>> {
        let full_path = self.base_path.join(document_key(path));
        tracing::debug!("Reading document from {}", full_path.display());

        let data = match tokio::fs::read(&full_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(parse_document(&full_path.display().to_string(), &data)))
    }
}
