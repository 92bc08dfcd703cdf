use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::project::{self, ContentType, Entity as Project, Priority};
use crate::entities::project_file;
use crate::error::AppError;
use crate::models::validation::{clean, clean_list, Validator};
use crate::pagination::Pagination;
use crate::state::AppState;
use crate::workflow::ProjectStatus;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    #[serde(default)]
    client: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    subtype: Option<String>,
    #[serde(default)]
    priority: Priority,
    due_date: Option<NaiveDate>,
    estimated_hours: Option<f64>,
    budget: Option<f64>,
    #[serde(default)]
    description: String,
    objectives: Option<String>,
    target_audience: Option<String>,
    #[serde(default)]
    platforms: Vec<String>,
    deliverables: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl CreateProjectRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required("client", &self.client)
            .required("title", &self.title)
            .required("description", &self.description)
            .present("due_date", &self.due_date)
            .non_negative("estimated_hours", self.estimated_hours)
            .non_negative("budget", self.budget)
            .finish()
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProjectRequest {
    client: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    content_type: Option<ContentType>,
    subtype: Option<String>,
    priority: Option<Priority>,
    due_date: Option<NaiveDate>,
    estimated_hours: Option<f64>,
    budget: Option<f64>,
    description: Option<String>,
    objectives: Option<String>,
    target_audience: Option<String>,
    platforms: Option<Vec<String>>,
    deliverables: Option<String>,
    tags: Option<Vec<String>>,
}

impl UpdateProjectRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .not_blank("client", self.client.as_deref())
            .not_blank("title", self.title.as_deref())
            .not_blank("description", self.description.as_deref())
            .non_negative("estimated_hours", self.estimated_hours)
            .non_negative("budget", self.budget)
            .finish()
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetStatusRequest {
    status: ProjectStatus,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RequestChangesRequest {
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FeedbackRequest {
    feedback: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub client: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ProjectFilter {
    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Which guided actions apply to the project's current status.
#[derive(Serialize, utoipa::ToSchema)]
pub struct WorkflowActions {
    /// `None` once the project is final delivered.
    advance_to: Option<ProjectStatus>,
    can_request_changes: bool,
}

impl From<ProjectStatus> for WorkflowActions {
    fn from(status: ProjectStatus) -> Self {
        WorkflowActions {
            advance_to: (!status.is_terminal()).then(|| status.advance()),
            can_request_changes: status.can_request_changes(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    id: i32,
    client: String,
    title: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    subtype: Option<String>,
    status: ProjectStatus,
    priority: Priority,
    version: i32,
    due_date: NaiveDate,
    estimated_hours: Option<f64>,
    budget: Option<f64>,
    description: String,
    objectives: Option<String>,
    target_audience: Option<String>,
    platforms: Vec<String>,
    deliverables: Option<String>,
    feedback: Option<String>,
    last_activity: Option<String>,
    tags: Vec<String>,
    actions: WorkflowActions,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<project::Model> for ProjectResponse {
    fn from(project: project::Model) -> Self {
        let status = project.workflow_status();
        ProjectResponse {
            id: project.id,
            client: project.client,
            title: project.title,
            content_type: project.content_type,
            subtype: project.subtype,
            status,
            priority: project.priority,
            version: project.version,
            due_date: project.due_date,
            estimated_hours: project.estimated_hours,
            budget: project.budget,
            description: project.description,
            objectives: project.objectives,
            target_audience: project.target_audience,
            platforms: project.platforms,
            deliverables: project.deliverables,
            feedback: project.feedback,
            last_activity: project.last_activity,
            tags: project.tags,
            actions: WorkflowActions::from(status),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

pub(crate) async fn find_project<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
) -> Result<project::Model, AppError> {
    Project::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Project not found".to_string()))
}

/// Writes a new status (and optional feedback) before anything is reported
/// back, so a failed write leaves the caller's view unchanged.
async fn persist_status<C: ConnectionTrait>(
    db: &C,
    project: project::Model,
    next: ProjectStatus,
    feedback: Option<String>,
) -> Result<project::Model, AppError> {
    let previous = project.workflow_status();
    let project_id = project.id;

    let mut active_project = project.into_active_model();
    active_project.status = Set(next.as_str().to_string());
    active_project.last_activity = Set(Some(format!("Status changed to {}", next.label())));
    if let Some(feedback) = feedback {
        active_project.feedback = Set(Some(feedback));
    }
    active_project.updated_at = Set(Utc::now().naive_utc());

    let updated = active_project.update(db).await?;
    tracing::info!(project_id, from = %previous, to = %next, "Project status changed");
    Ok(updated)
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ProjectResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    payload.validate()?;
    let due_date = payload
        .due_date
        .ok_or_else(|| AppError::Validation(vec!["due_date is required".to_string()]))?;

    let now = Utc::now().naive_utc();
    let project = project::ActiveModel {
        client: Set(payload.client.trim().to_string()),
        title: Set(payload.title.trim().to_string()),
        content_type: Set(payload.content_type),
        subtype: Set(clean(payload.subtype)),
        status: Set(ProjectStatus::INITIAL.as_str().to_string()),
        priority: Set(payload.priority),
        version: Set(1),
        due_date: Set(due_date),
        estimated_hours: Set(payload.estimated_hours),
        budget: Set(payload.budget),
        description: Set(payload.description.trim().to_string()),
        objectives: Set(clean(payload.objectives)),
        target_audience: Set(clean(payload.target_audience)),
        platforms: Set(clean_list(payload.platforms)),
        deliverables: Set(clean(payload.deliverables)),
        feedback: Set(None),
        last_activity: Set(Some("Project created".to_string())),
        tags: Set(clean_list(payload.tags)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created_project = project.insert(state.db.as_ref()).await?;

    tracing::info!(project_id = created_project.id, title = %created_project.title, "Project created");
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(created_project))))
}

#[utoipa::path(
    get,
    path = "/projects",
    params(ProjectFilter),
    responses(
        (status = 200, description = "Projects, newest first", body = [ProjectResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let pagination = filter.pagination();
    let mut query = Project::find();

    if let Some(status) = filter.status {
        query = query.filter(project::Column::Status.is_in(status.stored_aliases().iter().copied()));
    }
    if let Some(client) = clean(filter.client) {
        query = query.filter(project::Column::Client.eq(client));
    }

    let projects = query
        .order_by_desc(project::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(state.db.as_ref())
        .await?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;
    Ok(Json(ProjectResponse::from(project)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 400, description = "Blank mandatory field"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    payload.validate()?;
    let project = find_project(state.db.as_ref(), project_id).await?;

    let mut active_project = project.into_active_model();

    if let Some(client) = payload.client {
        active_project.client = Set(client.trim().to_string());
    }
    if let Some(title) = payload.title {
        active_project.title = Set(title.trim().to_string());
    }
    if let Some(content_type) = payload.content_type {
        active_project.content_type = Set(content_type);
    }
    if let Some(subtype) = payload.subtype {
        active_project.subtype = Set(clean(Some(subtype)));
    }
    if let Some(priority) = payload.priority {
        active_project.priority = Set(priority);
    }
    if let Some(due_date) = payload.due_date {
        active_project.due_date = Set(due_date);
    }
    if let Some(hours) = payload.estimated_hours {
        active_project.estimated_hours = Set(Some(hours));
    }
    if let Some(budget) = payload.budget {
        active_project.budget = Set(Some(budget));
    }
    if let Some(description) = payload.description {
        active_project.description = Set(description.trim().to_string());
    }
    if let Some(objectives) = payload.objectives {
        active_project.objectives = Set(clean(Some(objectives)));
    }
    if let Some(audience) = payload.target_audience {
        active_project.target_audience = Set(clean(Some(audience)));
    }
    if let Some(platforms) = payload.platforms {
        active_project.platforms = Set(clean_list(platforms));
    }
    if let Some(deliverables) = payload.deliverables {
        active_project.deliverables = Set(clean(Some(deliverables)));
    }
    if let Some(tags) = payload.tags {
        active_project.tags = Set(clean_list(tags));
    }

    active_project.last_activity = Set(Some("Project details updated".to_string()));
    active_project.updated_at = Set(Utc::now().naive_utc());

    let updated_project = active_project.update(state.db.as_ref()).await?;

    Ok(Json(ProjectResponse::from(updated_project)))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project and its files deleted"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;

    let files = project_file::Entity::find()
        .filter(project_file::Column::ProjectId.eq(project.id))
        .all(state.db.as_ref())
        .await?;

    // Rows cascade with the project; stored objects have to go one by one.
    for file in &files {
        if let Err(e) = state.store.delete_object(&file.s3_key).await {
            tracing::warn!(key = %file.s3_key, error = %e, "Failed to delete stored object");
        }
    }

    Project::delete_by_id(project.id).exec(state.db.as_ref()).await?;

    tracing::info!(project_id, files = files.len(), "Project deleted");
    Ok(Json(serde_json::json!({
        "message": "Project deleted successfully",
        "files_removed": files.len(),
    })))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/advance",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project moved to the next stage (no-op once final delivered)", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Workflow"
)]
pub async fn advance_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;
    let current = project.workflow_status();
    let next = current.advance();

    if next == current {
        return Ok(Json(ProjectResponse::from(project)));
    }

    let updated = persist_status(state.db.as_ref(), project, next, None).await?;
    Ok(Json(ProjectResponse::from(updated)))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/request-changes",
    params(("id" = i32, Path, description = "Project ID")),
    request_body(
        content = RequestChangesRequest,
        description = "Optional; an empty body keeps the stored feedback"
    ),
    responses(
        (status = 200, description = "Project sent back for revision", body = ProjectResponse),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Project is not under review")
    ),
    tag = "Workflow"
)]
pub async fn request_changes(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    payload: Option<Json<RequestChangesRequest>>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;
    let current = project.workflow_status();

    if !current.can_request_changes() {
        return Err(AppError::Conflict(format!(
            "Changes can only be requested during editor or client review (status is {})",
            current
        )));
    }

    let updated = persist_status(
        state.db.as_ref(),
        project,
        current.request_changes(),
        clean(payload.and_then(|Json(p)| p.feedback)),
    )
    .await?;
    Ok(Json(ProjectResponse::from(updated)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/status",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status set", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Workflow"
)]
pub async fn set_project_status(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;
    let next = project.workflow_status().set_status(payload.status);
    let updated = persist_status(state.db.as_ref(), project, next, None).await?;
    Ok(Json(ProjectResponse::from(updated)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/feedback",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback replaced", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    tag = "Workflow"
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;

    let mut active_project = project.into_active_model();
    active_project.feedback = Set(clean(payload.feedback));
    active_project.last_activity = Set(Some("Feedback updated".to_string()));
    active_project.updated_at = Set(Utc::now().naive_utc());

    let updated = active_project.update(state.db.as_ref()).await?;
    Ok(Json(ProjectResponse::from(updated)))
}
