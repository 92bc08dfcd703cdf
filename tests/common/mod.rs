#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use sea_orm::{DatabaseConnection, MockExecResult, Transaction};
use tower::ServiceExt;

use content_tracker::config::Config;
use content_tracker::entities::posted_content::{PostAnalytics, PostStatus};
use content_tracker::entities::project::{ContentType, Priority};
use content_tracker::entities::{client, editor, posted_content, project, project_file};
use content_tracker::error::AppError;
use content_tracker::routes::create_routes;
use content_tracker::services::object_store::ObjectStore;
use content_tracker::state::AppState;

pub const BOUNDARY: &str = "content-tracker-test-boundary";

/// In-memory object store. `fail_after(n)` lets the first `n` puts succeed
/// and rejects every later one.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    puts: AtomicUsize,
    put_limit: Option<usize>,
    unavailable: bool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_after(puts: usize) -> Self {
        Self {
            put_limit: Some(puts),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_object(self, key: &str, data: &[u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        self
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, AppError> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst);
        if self.unavailable || self.put_limit.is_some_and(|limit| attempt >= limit) {
            return Err(AppError::Storage("bucket unreachable".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("http://objects.test/bucket/{}", key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        if self.unavailable {
            return Err(AppError::Storage("bucket unreachable".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        Ok(format!(
            "http://objects.test/bucket/{}?expires={}",
            key,
            expires_in.as_secs()
        ))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/content_tracker_test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        aws_region: "us-east-1".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        s3_bucket_name: "bucket".to_string(),
        s3_endpoint: Some("http://objects.test".to_string()),
        cors_origins: vec![],
    }
}

pub fn build_test_app(db: Arc<DatabaseConnection>, store: Arc<MemoryObjectStore>) -> Router {
    create_routes(AppState::new(db, store, test_config()))
}

pub fn exec_ok(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Sends `(field name, file name, content type, bytes)` parts as one
/// multipart request. Parts with no file name are sent as text fields.
pub async fn send_multipart(
    app: Router,
    uri: &str,
    parts: &[(&str, Option<&str>, &str, &[u8])],
) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Drains the mock connection's log. The app built on `db` must already be
/// dropped so the handle here is the last one.
pub fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::try_unwrap(db)
        .unwrap_or_else(|_| panic!("connection still shared with a live app"))
        .into_transaction_log()
}

/// Every statement the mock connection saw, rendered for substring checks.
pub fn executed_sql(db: Arc<DatabaseConnection>) -> String {
    format!("{:?}", transaction_log(db))
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn project_model(id: i32, status: &str) -> project::Model {
    project::Model {
        id,
        client: "Acme Co".to_string(),
        title: "Spring launch reel".to_string(),
        content_type: ContentType::Video,
        subtype: Some("reel".to_string()),
        status: status.to_string(),
        priority: Priority::High,
        version: 1,
        due_date: NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
        estimated_hours: Some(12.5),
        budget: Some(1800.0),
        description: "30 second product teaser".to_string(),
        objectives: None,
        target_audience: None,
        platforms: vec!["instagram".to_string()],
        deliverables: None,
        feedback: None,
        last_activity: Some("Project created".to_string()),
        tags: vec!["launch".to_string()],
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn file_model(id: &str, project_id: i32, name: &str, version: &str, is_latest: bool) -> project_file::Model {
    project_file::Model {
        id: id.to_string(),
        project_id,
        name: name.to_string(),
        size: 2048,
        mime_type: "application/pdf".to_string(),
        s3_key: format!("projects/{}/{}-{}", project_id, id, name),
        url: format!("http://objects.test/bucket/projects/{}/{}-{}", project_id, id, name),
        upload_date: timestamp(),
        version: version.to_string(),
        uploaded_by: "Team".to_string(),
        is_latest,
        previous_version_id: None,
    }
}

pub fn post_model(id: i32, project_id: Option<i32>) -> posted_content::Model {
    posted_content::Model {
        id,
        project_id,
        project_title: Some("Spring launch reel".to_string()),
        client: Some("Acme Co".to_string()),
        content_form: "reel".to_string(),
        content_bucket: None,
        number_of_content: 1,
        link: None,
        caption: None,
        feedback: None,
        comments: None,
        number_of_likes: 0,
        live_link: None,
        platform: "instagram".to_string(),
        scheduled_date: None,
        posted_date: None,
        status: PostStatus::Draft,
        analytics: PostAnalytics::default(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn client_model(id: i32) -> client::Model {
    client::Model {
        id,
        name: "Dana Reyes".to_string(),
        email: "dana@acme.test".to_string(),
        company: "Acme Co".to_string(),
        phone: None,
        created_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn editor_model(id: i32) -> editor::Model {
    editor::Model {
        id,
        name: "Sam Okafor".to_string(),
        email: "sam@studio.test".to_string(),
        timezone: Some("Europe/Lisbon".to_string()),
        country: None,
        is_active: true,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}
