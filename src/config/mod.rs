use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_APP_NAME: &str = "S3 Upload Service";

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AWS access key id (required)
    pub aws_access_key_id: String,

    /// AWS secret access key (required)
    pub aws_secret_access_key: String,

    /// AWS region (default: "us-east-1")
    pub aws_region: String,

    /// Target bucket (required)
    pub s3_bucket_name: String,

    /// Custom endpoint for S3-compatible stores such as MinIO
    pub s3_endpoint_url: Option<String>,

    /// Verbose logging (default: false)
    pub debug: bool,

    pub app_name: String,
    pub app_version: String,

    /// Maximum upload size in bytes (default: 50 MB)
    pub max_file_size: usize,

    /// Allowed CORS origins, "*" for any (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_region: DEFAULT_REGION.to_string(),
            s3_bucket_name: String::new(),
            s3_endpoint_url: None,
            debug: false,
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            max_file_size: 50 * 1024 * 1024, // 50 MB
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (names are case-insensitive)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        let get = |name: &str| vars.get(name).cloned();
        let require = |name: &str| {
            get(name)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} must be set", name))
        };

        let default = Self::default();

        Ok(Self {
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            aws_region: get("AWS_REGION")
                .filter(|v| !v.is_empty())
                .unwrap_or(default.aws_region),
            s3_bucket_name: require("S3_BUCKET_NAME")?,
            s3_endpoint_url: get("S3_ENDPOINT_URL").filter(|v| !v.is_empty()),

            debug: get("DEBUG")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.debug),

            app_name: get("APP_NAME").unwrap_or(default.app_name),
            app_version: get("APP_VERSION").unwrap_or(default.app_version),

            max_file_size: get("MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),
        })
    }

    /// Create config for local development and tests (placeholder credentials)
    pub fn development() -> Self {
        Self {
            aws_access_key_id: "minioadmin".to_string(),
            aws_secret_access_key: "minioadmin".to_string(),
            s3_bucket_name: "uploads-dev".to_string(),
            s3_endpoint_url: Some("http://127.0.0.1:9000".to_string()),
            debug: true,
            ..Self::default()
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> Vec<(String, String)> {
        vars(&[
            ("AWS_ACCESS_KEY_ID", "key"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("S3_BUCKET_NAME", "voices"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_vars(required()).unwrap();
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.s3_bucket_name, "voices");
        assert!(config.s3_endpoint_url.is_none());
        assert!(!config.debug);
        assert_eq!(config.max_file_size, 50 * 1024 * 1024);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_missing_bucket_is_error() {
        let err = AppConfig::from_vars(vars(&[
            ("AWS_ACCESS_KEY_ID", "key"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET_NAME"));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let config = AppConfig::from_vars(vars(&[
            ("aws_access_key_id", "key"),
            ("aws_secret_access_key", "secret"),
            ("s3_bucket_name", "voices"),
            ("aws_region", "eu-west-2"),
            ("Debug", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.aws_region, "eu-west-2");
        assert!(config.debug);
    }

    #[test]
    fn test_overrides_parsed() {
        let mut v = required();
        v.extend(vars(&[
            ("MAX_FILE_SIZE", "1024"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, http://localhost:5173"),
            ("S3_ENDPOINT_URL", "http://127.0.0.1:9000"),
        ]));
        let config = AppConfig::from_vars(v).unwrap();
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
        assert!(!config.allows_any_origin());
        assert_eq!(
            config.s3_endpoint_url.as_deref(),
            Some("http://127.0.0.1:9000")
        );
    }

    #[test]
    fn test_unparsable_size_falls_back() {
        let mut v = required();
        v.extend(vars(&[("MAX_FILE_SIZE", "lots")]));
        let config = AppConfig::from_vars(v).unwrap();
        assert_eq!(config.max_file_size, 50 * 1024 * 1024);
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development();
        assert!(config.debug);
        assert_eq!(config.aws_region, "us-east-1");
        assert!(config.s3_endpoint_url.is_some());
    }
}
