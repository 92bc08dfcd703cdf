use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::editor::{self, Entity as Editor};
use crate::error::AppError;
use crate::models::validation::{clean, Validator};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEditorRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    timezone: Option<String>,
    country: Option<String>,
    is_active: Option<bool>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateEditorRequest {
    name: Option<String>,
    email: Option<String>,
    timezone: Option<String>,
    country: Option<String>,
    is_active: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EditorResponse {
    id: i32,
    name: String,
    email: String,
    timezone: Option<String>,
    country: Option<String>,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<editor::Model> for EditorResponse {
    fn from(model: editor::Model) -> Self {
        EditorResponse {
            id: model.id,
            name: model.name,
            email: model.email,
            timezone: model.timezone,
            country: model.country,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/editors",
    request_body = CreateEditorRequest,
    responses(
        (status = 201, description = "Editor created", body = EditorResponse),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "Editors"
)]
pub async fn create_editor(
    State(state): State<AppState>,
    Json(payload): Json<CreateEditorRequest>,
) -> Result<(StatusCode, Json<EditorResponse>), AppError> {
    Validator::new()
        .required("name", &payload.name)
        .required("email", &payload.email)
        .email("email", Some(&payload.email))
        .finish()?;

    let now = Utc::now().naive_utc();
    let created = editor::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        timezone: Set(clean(payload.timezone)),
        country: Set(clean(payload.country)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(EditorResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/editors",
    responses((status = 200, description = "All editors by name", body = [EditorResponse])),
    tag = "Editors"
)]
pub async fn list_editors(
    State(state): State<AppState>,
) -> Result<Json<Vec<EditorResponse>>, AppError> {
    let editors = Editor::find()
        .order_by_asc(editor::Column::Name)
        .all(state.db.as_ref())
        .await?;
    Ok(Json(editors.into_iter().map(EditorResponse::from).collect()))
}

async fn find_editor(state: &AppState, id: i32) -> Result<editor::Model, AppError> {
    Editor::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or(AppError::NotFound("Editor not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/editors/{id}",
    params(("id" = i32, Path, description = "Editor ID")),
    responses(
        (status = 200, description = "Editor details", body = EditorResponse),
        (status = 404, description = "Editor not found")
    ),
    tag = "Editors"
)]
pub async fn get_editor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EditorResponse>, AppError> {
    Ok(Json(EditorResponse::from(find_editor(&state, id).await?)))
}

#[utoipa::path(
    put,
    path = "/editors/{id}",
    params(("id" = i32, Path, description = "Editor ID")),
    request_body = UpdateEditorRequest,
    responses(
        (status = 200, description = "Editor updated", body = EditorResponse),
        (status = 404, description = "Editor not found")
    ),
    tag = "Editors"
)]
pub async fn update_editor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEditorRequest>,
) -> Result<Json<EditorResponse>, AppError> {
    Validator::new()
        .not_blank("name", payload.name.as_deref())
        .not_blank("email", payload.email.as_deref())
        .email("email", payload.email.as_deref())
        .finish()?;

    let mut active = find_editor(&state, id).await?.into_active_model();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(timezone) = payload.timezone {
        active.timezone = Set(clean(Some(timezone)));
    }
    if let Some(country) = payload.country {
        active.country = Set(clean(Some(country)));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(EditorResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/editors/{id}",
    params(("id" = i32, Path, description = "Editor ID")),
    responses(
        (status = 200, description = "Editor deleted"),
        (status = 404, description = "Editor not found")
    ),
    tag = "Editors"
)]
pub async fn delete_editor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = Editor::delete_by_id(id).exec(state.db.as_ref()).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Editor not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Editor deleted successfully" })))
}
