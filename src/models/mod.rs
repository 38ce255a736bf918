use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// A file received from the HTTP layer, checked before it reaches the gateway.
#[derive(Debug, Clone, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,

    #[validate(custom(function = "not_empty"))]
    pub content: Bytes,
}

fn not_empty(content: &Bytes) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::new("empty").with_message(Cow::Borrowed("File is empty")));
    }
    Ok(())
}

impl UploadRequest {
    /// Returns the first failing rule's message, filename checked before content.
    pub fn check(&self) -> Result<(), String> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        let message = ["file_name", "content"]
            .iter()
            .filter_map(|field| fields.get(*field))
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());

        Err(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub key: String,
    pub public_url: String,
    pub size: i64,
}

/// One entry of a prefix listing, as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub display_name: String,
    pub size_bytes: i64,
    pub last_modified: DateTime<Utc>,
    pub public_url: String,
}

/// Raw listing entry produced by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}
