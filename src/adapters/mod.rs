// Adapters layer: concrete document stores behind the `DocumentStore` port.

use serde_json::Value;

pub mod local;
pub mod memory;
#[cfg(feature = "lambda")]
pub mod s3;

pub use local::LocalDocumentStore;
pub use memory::{ManualClock, MemoryDocumentStore};
#[cfg(feature = "lambda")]
pub use s3::S3DocumentStore;

/// File name a document path is stored under: `config/emailDomains` -> `config/emailDomains.json`.
pub(crate) fn document_key(path: &str) -> String {
    format!("{}.json", path.trim_matches('/'))
}

/// Decodes a stored document. Bytes that are not JSON become `null`, which the
/// allow-list shape check then rejects as a broken document.
pub(crate) fn parse_document(key: &str, data: &[u8]) -> Value {
    serde_json::from_slice(data).unwrap_or_else(|e| {
        tracing::warn!("Document {} is not valid JSON: {}", key, e);
        Value::Null
    })
}
