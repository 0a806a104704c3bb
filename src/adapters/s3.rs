use crate::adapters::{document_key, parse_document};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{GateError, Result};
use async_trait::async_trait;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;
use serde_json::Value;

/// Documents stored as JSON objects in an S3 bucket, optionally under a prefix.
#[derive(Debug, Clone)]
pub struct S3DocumentStore {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3DocumentStore {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn object_key(&self, path: &str) -> String {
        let key = document_key(path);
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            key
        } else {
            format!("{}/{}", prefix, key)
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn get_document(&self, path: &str) -> Result<Option<Value>> {
        let key = self.object_key(path);
        tracing::debug!("Reading s3://{}/{}", self.bucket, key);

        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => Ok(None),
                    err => Err(GateError::StoreError {
                        message: format!("Failed to read from S3: {}", err),
                    }),
                }
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| GateError::StoreError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(Some(parse_document(&key, &data.into_bytes())))
    }
}
