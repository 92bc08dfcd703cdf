use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::services::object_store::ObjectStore;

/// Object store backed by an S3 (or S3-compatible) bucket.
#[derive(Clone)]
pub struct S3Service {
    client: Client,
    pub bucket_name: String,
    public_base_url: String,
}

fn build_client(config: &Config) -> Client {
    let credentials = Credentials::new(
        config.aws_access_key_id.clone(),
        config.aws_secret_access_key.clone(),
        None,
        None,
        "content-tracker-env",
    );

    let mut builder = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials);

    // MinIO and similar stores only understand path-style addressing.
    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    Client::from_conf(builder.build())
}

impl S3Service {
    pub fn new(config: &Config) -> Self {
        Self {
            client: build_client(config),
            bucket_name: config.s3_bucket_name.clone(),
            public_base_url: config.public_base_url(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Creates the bucket when it is missing and makes project files
    /// publicly readable.
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
            .is_ok();

        if !exists {
            tracing::info!(bucket = %self.bucket_name, "Creating bucket");
            self.client
                .create_bucket()
                .bucket(&self.bucket_name)
                .send()
                .await
                .map_err(|e| storage_error("create bucket", &self.bucket_name, e))?;
        }

        self.apply_read_policy().await
    }

    async fn apply_read_policy(&self) -> Result<(), AppError> {
        let policy = serde_json::json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Sid": "PublicReadProjectFiles",
                "Effect": "Allow",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{}/projects/*", self.bucket_name),
            }]
        });

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket_name)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|e| storage_error("set bucket policy", &self.bucket_name, e))?;

        tracing::debug!(bucket = %self.bucket_name, "Bucket read policy applied");
        Ok(())
    }
}

fn storage_error(action: &str, target: &str, err: impl std::fmt::Debug) -> AppError {
    tracing::error!(action, target, error = ?err, "S3 request failed");
    AppError::Storage(format!("Failed to {} for {}", action, target))
}

#[async_trait]
impl ObjectStore for S3Service {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| storage_error("upload object", key, e))?;

        Ok(self.public_url(key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error("delete object", key, e))?;
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            AppError::InternalServerError(format!("Invalid presign expiry: {}", e))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error("presign object", key, e))?;

        Ok(request.uri().to_string())
    }
}
