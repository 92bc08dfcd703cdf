use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::posted_content::{self, Entity as Post, PostAnalytics, PostStatus};
use crate::error::AppError;
use crate::models::validation::{clean, Validator};
use crate::pagination::{PaginatedResponse, Pagination};
use crate::routes::projects::find_project;
use crate::state::AppState;
use crate::workflow::ProjectStatus;

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct CreatePostRequest {
    project_id: Option<i32>,
    project_title: Option<String>,
    client: Option<String>,
    #[serde(default)]
    content_form: String,
    content_bucket: Option<String>,
    number_of_content: Option<i32>,
    link: Option<String>,
    caption: Option<String>,
    feedback: Option<String>,
    comments: Option<String>,
    number_of_likes: Option<i32>,
    live_link: Option<String>,
    #[serde(default)]
    platform: String,
    scheduled_date: Option<NaiveDate>,
    posted_date: Option<NaiveDate>,
    #[serde(default)]
    status: PostStatus,
    #[serde(default)]
    analytics: PostAnalytics,
}

impl CreatePostRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required("content_form", &self.content_form)
            .required("platform", &self.platform)
            .url("link", self.link.as_deref())
            .url("live_link", self.live_link.as_deref())
            .non_negative("number_of_content", self.number_of_content.map(f64::from))
            .non_negative("number_of_likes", self.number_of_likes.map(f64::from))
            .finish()?;
        validate_analytics(&self.analytics)
    }
}

/// Fields a post derived from a project can still set itself.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct DerivePostRequest {
    #[serde(default)]
    content_form: String,
    content_bucket: Option<String>,
    number_of_content: Option<i32>,
    caption: Option<String>,
    #[serde(default)]
    platform: String,
    scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    status: PostStatus,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    content_form: Option<String>,
    content_bucket: Option<String>,
    number_of_content: Option<i32>,
    link: Option<String>,
    caption: Option<String>,
    feedback: Option<String>,
    comments: Option<String>,
    number_of_likes: Option<i32>,
    live_link: Option<String>,
    platform: Option<String>,
    scheduled_date: Option<NaiveDate>,
    posted_date: Option<NaiveDate>,
    status: Option<PostStatus>,
    analytics: Option<PostAnalytics>,
}

impl UpdatePostRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .not_blank("content_form", self.content_form.as_deref())
            .not_blank("platform", self.platform.as_deref())
            .url("link", self.link.as_deref())
            .url("live_link", self.live_link.as_deref())
            .non_negative("number_of_content", self.number_of_content.map(f64::from))
            .non_negative("number_of_likes", self.number_of_likes.map(f64::from))
            .finish()?;
        match &self.analytics {
            Some(analytics) => validate_analytics(analytics),
            None => Ok(()),
        }
    }
}

fn validate_analytics(analytics: &PostAnalytics) -> Result<(), AppError> {
    let as_f64 = |v: Option<i64>| v.map(|n| n as f64);
    Validator::new()
        .non_negative("analytics.views", as_f64(analytics.views))
        .non_negative("analytics.shares", as_f64(analytics.shares))
        .non_negative("analytics.saves", as_f64(analytics.saves))
        .non_negative("analytics.reach", as_f64(analytics.reach))
        .finish()
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub platform: Option<String>,
    pub project_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    id: i32,
    project_id: Option<i32>,
    project_title: Option<String>,
    client: Option<String>,
    content_form: String,
    content_bucket: Option<String>,
    number_of_content: i32,
    link: Option<String>,
    caption: Option<String>,
    feedback: Option<String>,
    comments: Option<String>,
    number_of_likes: i32,
    live_link: Option<String>,
    platform: String,
    scheduled_date: Option<NaiveDate>,
    posted_date: Option<NaiveDate>,
    status: PostStatus,
    analytics: PostAnalytics,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<posted_content::Model> for PostResponse {
    fn from(model: posted_content::Model) -> Self {
        PostResponse {
            id: model.id,
            project_id: model.project_id,
            project_title: model.project_title,
            client: model.client,
            content_form: model.content_form,
            content_bucket: model.content_bucket,
            number_of_content: model.number_of_content,
            link: model.link,
            caption: model.caption,
            feedback: model.feedback,
            comments: model.comments,
            number_of_likes: model.number_of_likes,
            live_link: model.live_link,
            platform: model.platform,
            scheduled_date: model.scheduled_date,
            posted_date: model.posted_date,
            status: model.status,
            analytics: model.analytics,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn new_post(payload: CreatePostRequest) -> posted_content::ActiveModel {
    let now = Utc::now().naive_utc();
    posted_content::ActiveModel {
        project_id: Set(payload.project_id),
        project_title: Set(clean(payload.project_title)),
        client: Set(clean(payload.client)),
        content_form: Set(payload.content_form.trim().to_string()),
        content_bucket: Set(clean(payload.content_bucket)),
        number_of_content: Set(payload.number_of_content.unwrap_or(1)),
        link: Set(clean(payload.link)),
        caption: Set(clean(payload.caption)),
        feedback: Set(clean(payload.feedback)),
        comments: Set(clean(payload.comments)),
        number_of_likes: Set(payload.number_of_likes.unwrap_or(0)),
        live_link: Set(clean(payload.live_link)),
        platform: Set(payload.platform.trim().to_string()),
        scheduled_date: Set(payload.scheduled_date),
        posted_date: Set(payload.posted_date),
        status: Set(payload.status),
        analytics: Set(payload.analytics),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

async fn find_post(state: &AppState, id: i32) -> Result<posted_content::Model, AppError> {
    Post::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Referenced project not found")
    ),
    tag = "Posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    Json(mut payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    payload.validate()?;

    // A linked project fills in the denormalised title/client when omitted.
    if let Some(project_id) = payload.project_id {
        let project = find_project(state.db.as_ref(), project_id).await?;
        payload.project_title = payload.project_title.or(Some(project.title));
        payload.client = payload.client.or(Some(project.client));
    }

    let created = new_post(payload).insert(state.db.as_ref()).await?;
    tracing::info!(post_id = created.id, platform = %created.platform, "Post created");
    Ok((StatusCode::CREATED, Json(PostResponse::from(created))))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/posts",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = DerivePostRequest,
    responses(
        (status = 201, description = "Post created from the delivered project", body = PostResponse),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Project is not final delivered")
    ),
    tag = "Posts"
)]
pub async fn create_post_from_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<DerivePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let project = find_project(state.db.as_ref(), project_id).await?;
    if project.workflow_status() != ProjectStatus::FinalDelivered {
        return Err(AppError::Conflict(
            "Posts can only be created from final delivered projects".to_string(),
        ));
    }

    let request = CreatePostRequest {
        project_id: Some(project.id),
        project_title: Some(project.title),
        client: Some(project.client),
        content_form: payload.content_form,
        content_bucket: payload.content_bucket,
        number_of_content: payload.number_of_content,
        caption: payload.caption,
        platform: payload.platform,
        scheduled_date: payload.scheduled_date,
        status: payload.status,
        ..Default::default()
    };
    request.validate()?;

    let created = new_post(request).insert(state.db.as_ref()).await?;
    tracing::info!(post_id = created.id, project_id, "Post derived from project");
    Ok((StatusCode::CREATED, Json(PostResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/posts",
    params(PostFilter),
    responses((status = 200, description = "Posts, newest first", body = PaginatedResponse<PostResponse>)),
    tag = "Posts"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> Result<Json<PaginatedResponse<PostResponse>>, AppError> {
    let pagination = Pagination {
        page: filter.page,
        limit: filter.limit,
    };

    let mut query = Post::find();
    if let Some(status) = filter.status {
        query = query.filter(posted_content::Column::Status.eq(status));
    }
    if let Some(platform) = clean(filter.platform) {
        query = query.filter(posted_content::Column::Platform.eq(platform));
    }
    if let Some(project_id) = filter.project_id {
        query = query.filter(posted_content::Column::ProjectId.eq(project_id));
    }

    let total_items = query.clone().count(state.db.as_ref()).await?;
    let posts = query
        .order_by_desc(posted_content::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(state.db.as_ref())
        .await?;

    Ok(Json(PaginatedResponse::new(
        posts.into_iter().map(PostResponse::from).collect(),
        total_items,
        pagination.page(),
        pagination.limit(),
    )))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(PostResponse::from(find_post(&state, id).await?)))
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts"
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    payload.validate()?;
    let mut active = find_post(&state, id).await?.into_active_model();

    if let Some(v) = payload.content_form {
        active.content_form = Set(v.trim().to_string());
    }
    if let Some(v) = payload.content_bucket {
        active.content_bucket = Set(clean(Some(v)));
    }
    if let Some(v) = payload.number_of_content {
        active.number_of_content = Set(v);
    }
    if let Some(v) = payload.link {
        active.link = Set(clean(Some(v)));
    }
    if let Some(v) = payload.caption {
        active.caption = Set(clean(Some(v)));
    }
    if let Some(v) = payload.feedback {
        active.feedback = Set(clean(Some(v)));
    }
    if let Some(v) = payload.comments {
        active.comments = Set(clean(Some(v)));
    }
    if let Some(v) = payload.number_of_likes {
        active.number_of_likes = Set(v);
    }
    if let Some(v) = payload.live_link {
        active.live_link = Set(clean(Some(v)));
    }
    if let Some(v) = payload.platform {
        active.platform = Set(v.trim().to_string());
    }
    if let Some(v) = payload.scheduled_date {
        active.scheduled_date = Set(Some(v));
    }
    if let Some(v) = payload.posted_date {
        active.posted_date = Set(Some(v));
    }
    if let Some(v) = payload.status {
        active.status = Set(v);
    }
    if let Some(v) = payload.analytics {
        active.analytics = Set(v);
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(PostResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = Post::delete_by_id(id).exec(state.db.as_ref()).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Post deleted successfully" })))
}

#[utoipa::path(
    delete,
    path = "/posts",
    responses((status = 200, description = "Every post removed")),
    tag = "Posts"
)]
pub async fn clear_posts(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = Post::delete_many().exec(state.db.as_ref()).await?;
    tracing::warn!(removed = res.rows_affected, "All posts cleared");
    Ok(Json(serde_json::json!({
        "message": "All posts cleared",
        "removed": res.rows_affected,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_checks_links_and_counters() {
        let payload: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "content_form": "reel",
            "platform": "instagram",
            "link": "not a url",
            "number_of_likes": -3,
            "analytics": { "views": -1 }
        }))
        .unwrap();
        match payload.validate() {
            Err(AppError::Validation(errors)) => assert_eq!(
                errors,
                vec!["link must be an absolute URL", "number_of_likes must not be negative"]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn analytics_rejected_after_field_checks_pass() {
        let payload: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "content_form": "reel",
            "platform": "instagram",
            "analytics": { "views": -1, "reach": 40 }
        }))
        .unwrap();
        assert!(matches!(
            payload.validate(),
            Err(AppError::Validation(errors)) if errors == vec!["analytics.views must not be negative"]
        ));
    }

    #[test]
    fn analytics_defaults_to_empty_record() {
        let payload: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "content_form": "carousel",
            "platform": "linkedin"
        }))
        .unwrap();
        assert_eq!(payload.analytics, PostAnalytics::default());
        assert_eq!(payload.status, PostStatus::Draft);
        assert!(payload.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&payload.analytics).unwrap(),
            serde_json::json!({})
        );
    }
}
