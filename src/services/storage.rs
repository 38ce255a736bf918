use crate::models::StoredObject;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::fmt::Debug;
use thiserror::Error;

/// Failure reported by an object store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The store answered with a structured error response.
    #[error("{message}")]
    Service {
        code: Option<String>,
        message: String,
    },

    /// The request never produced a structured response (dispatch, timeout, I/O).
    #[error("{0}")]
    Transport(String),
}

impl BackendError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Service {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Put / list / delete by key, addressed by bucket.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), BackendError>;
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, BackendError>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BackendError>;
}

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn backend_error<E, R>(err: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    match err {
        SdkError::ServiceError(ctx) => {
            let err = ctx.into_err();
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            BackendError::Service {
                code: err.code().map(str::to_string),
                message,
            }
        }
        other => BackendError::Transport(DisplayErrorContext(&other).to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), BackendError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, BackendError> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(backend_error)?;

            for object in res.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let last_modified = object
                    .last_modified()
                    .and_then(|d| chrono::DateTime::from_timestamp(d.secs(), d.subsec_nanos()))
                    .unwrap_or_default();

                objects.push(StoredObject {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0),
                    last_modified,
                });
            }

            match res.next_continuation_token() {
                Some(token) if res.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BackendError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::put_object::PutObjectError;

    #[test]
    fn test_service_error_keeps_code_and_message() {
        let meta = ErrorMetadata::builder()
            .code("AccessDenied")
            .message("Access Denied")
            .build();
        let err: SdkError<PutObjectError, ()> =
            SdkError::service_error(PutObjectError::generic(meta), ());

        assert_eq!(
            backend_error(err),
            BackendError::service("AccessDenied", "Access Denied")
        );
    }

    #[test]
    fn test_service_error_without_code() {
        let meta = ErrorMetadata::builder().message("throttled").build();
        let err: SdkError<PutObjectError, ()> =
            SdkError::service_error(PutObjectError::generic(meta), ());

        assert_eq!(
            backend_error(err),
            BackendError::Service {
                code: None,
                message: "throttled".to_string(),
            }
        );
    }

    #[test]
    fn test_non_service_error_is_transport() {
        let err: SdkError<PutObjectError, ()> = SdkError::construction_failure("invalid key");

        assert!(matches!(backend_error(err), BackendError::Transport(_)));
    }
}
