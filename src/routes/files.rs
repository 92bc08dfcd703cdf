use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use chrono::NaiveDateTime;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entities::project_file;
use crate::error::AppError;
use crate::routes::projects::find_project;
use crate::services::attachments::{self, NewUpload, DEFAULT_UPLOADER};
use crate::state::AppState;

const PRESIGNED_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListFilesQuery {
    /// Only versions of this exact file name.
    pub name: Option<String>,
    /// Only records flagged as the latest version of their name.
    pub latest_only: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FileResponse {
    pub id: String,
    pub project_id: i32,
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub url: String,
    pub upload_date: NaiveDateTime,
    pub version: String,
    pub uploaded_by: String,
    pub is_latest: bool,
    pub previous_version_id: Option<String>,
}

impl From<project_file::Model> for FileResponse {
    fn from(model: project_file::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            name: model.name,
            size: model.size,
            mime_type: model.mime_type,
            url: model.url,
            upload_date: model.upload_date,
            version: model.version,
            uploaded_by: model.uploaded_by,
            is_latest: model.is_latest,
            previous_version_id: model.previous_version_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadBatchResponse {
    pub uploaded: Vec<FileResponse>,
    /// Set when the batch stopped early; files before it stay committed.
    pub failed: Option<UploadFailure>,
}

async fn find_file(state: &AppState, id: &str) -> Result<project_file::Model, AppError> {
    project_file::Entity::find_by_id(id.to_string())
        .one(state.db.as_ref())
        .await?
        .ok_or(AppError::NotFound("File not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/files",
    params(
        ("id" = i32, Path, description = "Project ID"),
        ListFilesQuery
    ),
    responses(
        (status = 200, description = "Files attached to the project, newest first", body = [FileResponse]),
        (status = 404, description = "Project not found")
    ),
    tag = "Files"
)]
pub async fn list_project_files(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileResponse>>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;

    let mut select = project_file::Entity::find()
        .filter(project_file::Column::ProjectId.eq(project.id));
    if let Some(name) = query.name {
        select = select.filter(project_file::Column::Name.eq(name));
    }
    if query.latest_only.unwrap_or(false) {
        select = select.filter(project_file::Column::IsLatest.eq(true));
    }

    let files = select
        .order_by_desc(project_file::Column::UploadDate)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/files",
    params(("id" = i32, Path, description = "Project ID")),
    request_body(
        content = Vec<u8>,
        content_type = "multipart/form-data",
        description = "One or more `file` parts, optionally preceded by an `uploaded_by` text part"
    ),
    responses(
        (status = 201, description = "All files uploaded", body = UploadBatchResponse),
        (status = 207, description = "Some files uploaded before a failure", body = UploadBatchResponse),
        (status = 400, description = "No file part in the request"),
        (status = 404, description = "Project not found"),
        (status = 502, description = "Object store unavailable")
    ),
    tag = "Files"
)]
pub async fn upload_files(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadBatchResponse>), AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;

    let mut uploaded_by = DEFAULT_UPLOADER.to_string();
    let mut uploaded: Vec<FileResponse> = Vec::new();
    let mut failed: Option<(String, AppError)> = None;

    // Parts are stored strictly in the order they arrive.
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                failed = Some((
                    "multipart".to_string(),
                    AppError::BadRequest(format!("Invalid multipart data: {}", e)),
                ));
                break;
            }
        };

        let part_name = field.name().map(str::to_owned);
        match part_name.as_deref() {
            Some("uploaded_by") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::BadRequest("Invalid uploaded_by field".to_string()))?;
                if !text.trim().is_empty() {
                    uploaded_by = text.trim().to_string();
                }
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("").trim().to_string();
                if filename.is_empty() {
                    failed = Some((
                        filename,
                        AppError::BadRequest("File part has no file name".to_string()),
                    ));
                    break;
                }
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        failed = Some((
                            filename,
                            AppError::BadRequest(format!("Failed to read file bytes: {}", e)),
                        ));
                        break;
                    }
                };

                let upload = NewUpload {
                    name: filename.clone(),
                    mime_type,
                    data: data.to_vec(),
                    uploaded_by: uploaded_by.clone(),
                };

                match attachments::attach_file(state.db.as_ref(), state.store.as_ref(), project.id, upload)
                    .await
                {
                    Ok(model) => uploaded.push(FileResponse::from(model)),
                    Err(e) => {
                        failed = Some((filename, e));
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    match failed {
        None if uploaded.is_empty() => Err(AppError::BadRequest("No file field found".to_string())),
        None => {
            tracing::info!(project_id, count = uploaded.len(), "Upload batch complete");
            Ok((
                StatusCode::CREATED,
                Json(UploadBatchResponse {
                    uploaded,
                    failed: None,
                }),
            ))
        }
        Some((_, e)) if uploaded.is_empty() => Err(e),
        Some((filename, e)) => {
            tracing::warn!(
                project_id,
                committed = uploaded.len(),
                file = %filename,
                error = %e,
                "Upload batch stopped early"
            );
            Ok((
                StatusCode::MULTI_STATUS,
                Json(UploadBatchResponse {
                    uploaded,
                    failed: Some(UploadFailure {
                        filename,
                        error: e.public_message(),
                    }),
                }),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File details", body = FileResponse),
        (status = 404, description = "File not found")
    ),
    tag = "Files"
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileResponse>, AppError> {
    let file = find_file(&state, &id).await?;
    Ok(Json(FileResponse::from(file)))
}

#[utoipa::path(
    get,
    path = "/files/{id}/content",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 307, description = "Temporary redirect to a presigned download URL"),
        (status = 404, description = "File not found")
    ),
    tag = "Files"
)]
pub async fn get_file_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let file = find_file(&state, &id).await?;
    let url = state
        .store
        .presigned_url(&file.s3_key, PRESIGNED_URL_TTL)
        .await?;
    Ok(Redirect::temporary(&url))
}

#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File and stored object deleted"),
        (status = 404, description = "File not found"),
        (status = 502, description = "Object store unavailable; nothing was deleted")
    ),
    tag = "Files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let file = find_file(&state, &id).await?;
    attachments::remove_file(state.db.as_ref(), state.store.as_ref(), file).await?;

    Ok(Json(serde_json::json!({
        "message": "File deleted successfully",
        "id": id
    })))
}
