#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use s3_upload_backend::config::AppConfig;
use s3_upload_backend::models::StoredObject;
use s3_upload_backend::services::gateway::StorageGateway;
use s3_upload_backend::services::storage::{BackendError, ObjectStore};
use s3_upload_backend::{AppState, create_app};
use std::sync::{Arc, Mutex};

pub const BUCKET: &str = "voice-bucket";
pub const REGION: &str = "eu-west-1";

struct Entry {
    key: String,
    data: Bytes,
    last_modified: DateTime<Utc>,
}

/// Keeps objects in insertion order, which is the order `list_objects` returns.
pub struct MemoryObjectStore {
    objects: Mutex<Vec<Entry>>,
    failure: Mutex<Option<BackendError>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every subsequent call fails with `err`.
    pub fn fail_with(&self, err: BackendError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn insert(&self, key: &str, data: &[u8], last_modified: DateTime<Utc>) {
        self.objects.lock().unwrap().push(Entry {
            key: key.to_string(),
            data: Bytes::copy_from_slice(data),
            last_modified,
        });
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.data.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// `"{operation} {bucket}/{key or prefix}"` for every call received.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, bucket: &str, target: &str) -> Result<(), BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}/{}", operation, bucket, target));
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), BackendError> {
        self.record("put", bucket, key)?;
        let mut objects = self.objects.lock().unwrap();
        objects.retain(|e| e.key != key);
        objects.push(Entry {
            key: key.to_string(),
            data,
            last_modified: Utc::now(),
        });
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredObject>, BackendError> {
        self.record("list", bucket, prefix)?;
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.key.starts_with(prefix))
            .map(|e| StoredObject {
                key: e.key.clone(),
                size: e.data.len() as i64,
                last_modified: e.last_modified,
            })
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BackendError> {
        self.record("delete", bucket, key)?;
        self.objects.lock().unwrap().retain(|e| e.key != key);
        Ok(())
    }
}

pub fn gateway(store: Arc<MemoryObjectStore>) -> StorageGateway {
    StorageGateway::new(store, BUCKET.to_string(), REGION.to_string())
}

pub fn app_with(store: Arc<MemoryObjectStore>, config: AppConfig) -> axum::Router {
    create_app(AppState {
        gateway: Arc::new(gateway(store)),
        config,
    })
}

pub fn app(store: Arc<MemoryObjectStore>) -> axum::Router {
    app_with(store, AppConfig::development())
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}
