use crate::models::{ObjectSummary, UploadResult};
use crate::services::storage::{BackendError, ObjectStore};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Every object written by the gateway lives under this prefix.
pub const UPLOAD_PREFIX: &str = "uploads/";

const UNKNOWN_CODE: &str = "Unknown";
const DELETE_ERROR_CODE: &str = "DeleteError";

/// Normalized failure returned across the gateway boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{code}: {message}")]
    Backend { code: String, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl StorageError {
    pub fn code(&self) -> Option<&str> {
        match self {
            StorageError::Backend { code, .. } => Some(code),
            StorageError::Unexpected(_) => None,
        }
    }

    /// Delete failures are always reported under one code.
    fn delete_failure(err: BackendError) -> Self {
        StorageError::Backend {
            code: DELETE_ERROR_CODE.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for StorageError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Service { code, message } => StorageError::Backend {
                code: code.unwrap_or_else(|| UNKNOWN_CODE.to_string()),
                message,
            },
            BackendError::Transport(message) => StorageError::Unexpected(message),
        }
    }
}

/// Translates upload / list / delete intents into object store calls.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct StorageGateway {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: String, region: String) -> Self {
        Self {
            store,
            bucket,
            region,
        }
    }

    /// No sanitization: the name is appended as-is and a repeated name overwrites.
    pub fn object_key(file_name: &str) -> String {
        format!("{}{}", UPLOAD_PREFIX, file_name)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key)
    }

    /// Stores `content` at `uploads/{file_name}`.
    ///
    /// Callers are expected to reject an empty name or empty content first.
    pub async fn upload(
        &self,
        content: Bytes,
        file_name: &str,
    ) -> Result<UploadResult, StorageError> {
        let key = Self::object_key(file_name);
        let size = content.len() as i64;

        info!("⬆️  Uploading {} ({} bytes) to bucket {}", key, size, self.bucket);

        self.store
            .put_object(&self.bucket, &key, content)
            .await
            .map_err(|e| {
                let err = StorageError::from(e);
                error!("PutObject failed for {}: {}", key, err);
                err
            })?;

        Ok(UploadResult {
            public_url: self.public_url(&key),
            key,
            size,
        })
    }

    /// Lists objects under `prefix`, newest first.
    ///
    /// The folder placeholder whose key equals the prefix is skipped. Equal
    /// timestamps keep the backend's order.
    pub async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError> {
        let objects = self
            .store
            .list_objects(&self.bucket, prefix)
            .await
            .map_err(|e| {
                let err = StorageError::from(e);
                error!("ListObjectsV2 failed for prefix {}: {}", prefix, err);
                err
            })?;

        let mut summaries: Vec<ObjectSummary> = objects
            .into_iter()
            .filter(|object| object.key != prefix)
            .map(|object| ObjectSummary {
                display_name: object
                    .key
                    .strip_prefix(prefix)
                    .unwrap_or(&object.key)
                    .to_string(),
                public_url: self.public_url(&object.key),
                size_bytes: object.size,
                last_modified: object.last_modified,
                key: object.key,
            })
            .collect();

        summaries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        debug!("Listed {} objects under {}", summaries.len(), prefix);
        Ok(summaries)
    }

    pub async fn list_uploads(&self) -> Result<Vec<ObjectSummary>, StorageError> {
        self.list_by_prefix(UPLOAD_PREFIX).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.store
            .delete_object(&self.bucket, key)
            .await
            .map_err(|e| {
                error!("DeleteObject failed for {}: {}", key, e);
                StorageError::delete_failure(e)
            })?;

        info!("🗑️  Deleted {}", key);
        Ok(true)
    }
}
