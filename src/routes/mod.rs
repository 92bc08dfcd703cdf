pub mod clients;
pub mod editors;
pub mod files;
pub mod health;
pub mod home;
pub mod posts;
pub mod projects;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// Largest accepted multipart body for file uploads.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        health::health,
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        projects::update_project,
        projects::delete_project,
        projects::advance_project,
        projects::request_changes,
        projects::set_project_status,
        projects::update_feedback,
        files::list_project_files,
        files::upload_files,
        files::get_file,
        files::get_file_content,
        files::delete_file,
        clients::create_client,
        clients::list_clients,
        clients::get_client,
        clients::update_client,
        clients::delete_client,
        clients::list_client_projects,
        posts::create_post,
        posts::create_post_from_project,
        posts::list_posts,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
        posts::clear_posts,
        editors::create_editor,
        editors::list_editors,
        editors::get_editor,
        editors::update_editor,
        editors::delete_editor,
    ),
    components(
        schemas(
            health::HealthResponse,
            projects::CreateProjectRequest,
            projects::UpdateProjectRequest,
            projects::SetStatusRequest,
            projects::RequestChangesRequest,
            projects::FeedbackRequest,
            projects::ProjectResponse,
            projects::WorkflowActions,
            files::FileResponse,
            files::UploadBatchResponse,
            files::UploadFailure,
            clients::CreateClientRequest,
            clients::UpdateClientRequest,
            clients::ClientResponse,
            posts::CreatePostRequest,
            posts::DerivePostRequest,
            posts::UpdatePostRequest,
            posts::PostResponse,
            editors::CreateEditorRequest,
            editors::UpdateEditorRequest,
            editors::EditorResponse,
            crate::workflow::ProjectStatus,
            crate::entities::project::ContentType,
            crate::entities::project::Priority,
            crate::entities::posted_content::PostStatus,
            crate::entities::posted_content::PostAnalytics,
        )
    ),
    tags(
        (name = "General", description = "Service information"),
        (name = "Projects", description = "Client content projects"),
        (name = "Workflow", description = "Project status transitions"),
        (name = "Files", description = "Versioned project files"),
        (name = "Clients", description = "Client contacts"),
        (name = "Posts", description = "Scheduled and published content"),
        (name = "Editors", description = "Editing team")
    ),
    info(
        title = "Content Tracker API",
        version = "0.1.0",
        description = "Tracks agency content projects through review, their file versions, and the posts made from them",
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let project_routes = Router::new()
        .route(
            "/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/advance", post(projects::advance_project))
        .route(
            "/projects/{id}/request-changes",
            post(projects::request_changes),
        )
        .route("/projects/{id}/status", put(projects::set_project_status))
        .route("/projects/{id}/feedback", put(projects::update_feedback))
        .route(
            "/projects/{id}/files",
            get(files::list_project_files)
                .post(files::upload_files)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/projects/{id}/posts", post(posts::create_post_from_project));

    let file_routes = Router::new()
        .route("/files/{id}", get(files::get_file).delete(files::delete_file))
        .route("/files/{id}/content", get(files::get_file_content));

    let client_routes = Router::new()
        .route(
            "/clients",
            post(clients::create_client).get(clients::list_clients),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/clients/{id}/projects", get(clients::list_client_projects));

    let post_routes = Router::new()
        .route(
            "/posts",
            post(posts::create_post)
                .get(posts::list_posts)
                .delete(posts::clear_posts),
        )
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        );

    let editor_routes = Router::new()
        .route(
            "/editors",
            post(editors::create_editor).get(editors::list_editors),
        )
        .route(
            "/editors/{id}",
            get(editors::get_editor)
                .put(editors::update_editor)
                .delete(editors::delete_editor),
        );

    let cors = cors_layer(&state.config.cors_origins);

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/health", get(health::health))
        .merge(project_routes)
        .merge(file_routes)
        .merge(client_routes)
        .merge(post_routes)
        .merge(editor_routes)
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
