use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;

/// Key-addressed blob storage holding uploaded project files.
///
/// Implementations work against a single configured bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `key` and returns its public URL.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;

    async fn delete_object(&self, key: &str) -> Result<(), AppError>;

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError>;
}

/// Storage key for an upload: `projects/{project_id}/{file_id}-{file_name}`.
pub fn storage_key(project_id: i32, file_id: &str, file_name: &str) -> String {
    format!("projects/{}/{}-{}", project_id, file_id, file_name)
}
