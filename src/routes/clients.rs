use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::client::{self, Entity as Client};
use crate::entities::project;
use crate::error::AppError;
use crate::models::validation::{clean, Validator};
use crate::routes::projects::ProjectResponse;
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateClientRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    company: String,
    phone: Option<String>,
    /// Defaults to today.
    created_date: Option<NaiveDate>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateClientRequest {
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    phone: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ClientResponse {
    id: i32,
    name: String,
    email: String,
    company: String,
    phone: Option<String>,
    created_date: NaiveDate,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<client::Model> for ClientResponse {
    fn from(model: client::Model) -> Self {
        ClientResponse {
            id: model.id,
            name: model.name,
            email: model.email,
            company: model.company,
            phone: model.phone,
            created_date: model.created_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

async fn find_client(state: &AppState, id: i32) -> Result<client::Model, AppError> {
    Client::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or(AppError::NotFound("Client not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Missing or invalid fields")
    ),
    tag = "Clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    Validator::new()
        .required("name", &payload.name)
        .required("email", &payload.email)
        .required("company", &payload.company)
        .email("email", Some(&payload.email))
        .finish()?;

    let now = Utc::now().naive_utc();
    let client = client::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        company: Set(payload.company.trim().to_string()),
        phone: Set(clean(payload.phone)),
        created_date: Set(payload.created_date.unwrap_or_else(|| now.date())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = client.insert(state.db.as_ref()).await?;
    tracing::info!(client_id = created.id, company = %created.company, "Client created");
    Ok((StatusCode::CREATED, Json(ClientResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/clients",
    responses((status = 200, description = "All clients by name", body = [ClientResponse])),
    tag = "Clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let clients = Client::find()
        .order_by_asc(client::Column::Name)
        .all(state.db.as_ref())
        .await?;
    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client details", body = ClientResponse),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ClientResponse>, AppError> {
    Ok(Json(ClientResponse::from(find_client(&state, id).await?)))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 400, description = "Blank or invalid field"),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    Validator::new()
        .not_blank("name", payload.name.as_deref())
        .not_blank("email", payload.email.as_deref())
        .not_blank("company", payload.company.as_deref())
        .email("email", payload.email.as_deref())
        .finish()?;

    let mut active = find_client(&state, id).await?.into_active_model();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(company) = payload.company {
        active.company = Set(company.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(clean(Some(phone)));
    }
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(ClientResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client deleted; projects naming it are kept"),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let res = Client::delete_by_id(id).exec(state.db.as_ref()).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Client not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "message": "Client deleted successfully" })))
}

#[utoipa::path(
    get,
    path = "/clients/{id}/projects",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Projects whose client field matches this client's company", body = [ProjectResponse]),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients"
)]
pub async fn list_client_projects(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let client = find_client(&state, id).await?;
    let projects = project::Entity::find()
        .filter(project::Column::Client.eq(client.company))
        .order_by_desc(project::Column::CreatedAt)
        .all(state.db.as_ref())
        .await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}
