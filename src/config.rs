use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub s3_bucket_name: String,
    /// Custom endpoint for S3-compatible stores (MinIO and friends).
    pub s3_endpoint: Option<String>,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 3000,
        };

        let s3_endpoint = optional("S3_ENDPOINT")
            .map(|endpoint| -> Result<String, ConfigError> {
                url::Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
                    name: "S3_ENDPOINT",
                    reason: e.to_string(),
                })?;
                Ok(endpoint.trim_end_matches('/').to_string())
            })
            .transpose()?;

        let cors_origins = optional("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            aws_region: required("AWS_REGION")?,
            aws_access_key_id: required("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            s3_bucket_name: required("S3_BUCKET_NAME")?,
            s3_endpoint,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL objects are publicly reachable under.
    pub fn public_base_url(&self) -> String {
        match &self.s3_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint, self.s3_bucket_name),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.s3_bucket_name, self.aws_region
            ),
        }
    }
}
