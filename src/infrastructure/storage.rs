use crate::config::AppConfig;
use crate::services::storage::S3ObjectStore;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::{error, info};

pub async fn setup_storage(config: &AppConfig) -> Arc<S3ObjectStore> {
    let mut loader = aws_config::from_env()
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "static",
        ));

    if let Some(endpoint_url) = &config.s3_endpoint_url {
        info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, config.s3_bucket_name);
        loader = loader.endpoint_url(endpoint_url);
    } else {
        info!(
            "☁️  S3 Storage: AWS {} (Bucket: {})",
            config.aws_region, config.s3_bucket_name
        );
    }

    let aws_config = loader.load().await;

    // S3-compatible stores are addressed path-style
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.s3_endpoint_url.is_some())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    if config.s3_endpoint_url.is_some() {
        ensure_bucket(&s3_client, &config.s3_bucket_name).await;
    }

    Arc::new(S3ObjectStore::new(s3_client))
}

/// Creates the bucket on a local S3-compatible store when it is missing.
async fn ensure_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => info!("✅ Bucket '{}' is ready", bucket),
        Err(_) => {
            info!("🪣 Bucket '{}' not found, creating...", bucket);
            if let Err(e) = client.create_bucket().bucket(bucket).send().await {
                error!("❌ Failed to create bucket '{}': {}", bucket, e);
            } else {
                info!("✅ Bucket '{}' created successfully", bucket);
            }
        }
    }
}
