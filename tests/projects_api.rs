//! Integration tests for project CRUD and the status workflow endpoints.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    body_json, exec_ok, executed_sql, get, post_empty, project_model, send_json, MemoryObjectStore,
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;

use content_tracker::entities::project;

fn store() -> Arc<MemoryObjectStore> {
    Arc::new(MemoryObjectStore::new())
}

#[tokio::test]
async fn create_project_starts_in_draft() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(1, "draft")]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = send_json(
        app,
        Method::POST,
        "/projects",
        json!({
            "client": " Acme Co ",
            "title": "Spring launch reel",
            "type": "video",
            "due_date": "2026-04-15",
            "description": "30 second product teaser",
            "platforms": ["instagram", " instagram "]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "draft");
    assert_eq!(body["type"], "video");
    assert_eq!(body["actions"]["advance_to"], "editor_review");
    assert_eq!(body["actions"]["can_request_changes"], false);

    let sql = executed_sql(db);
    assert!(sql.contains("INSERT INTO \\\"projects\\\""), "{sql}");
    assert!(sql.contains("\"Acme Co\""), "client is trimmed before insert");
    assert!(sql.contains("\"Project created\""));
}

#[tokio::test]
async fn create_project_reports_every_missing_field() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = common::build_test_app(db, store());

    let response = send_json(
        app,
        Method::POST,
        "/projects",
        json!({ "type": "image", "budget": -5.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([
            "client is required",
            "title is required",
            "description is required",
            "due_date is required",
            "budget must not be negative"
        ])
    );
}

#[tokio::test]
async fn legacy_status_is_normalised_on_read() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(3, "pending_review")]])
            .into_connection(),
    );
    let app = common::build_test_app(db, store());

    let response = get(app, "/projects/3").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "client_review");
    assert_eq!(body["actions"]["advance_to"], "approved");
    assert_eq!(body["actions"]["can_request_changes"], true);
}

#[tokio::test]
async fn unknown_project_is_404() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection(),
    );
    let app = common::build_test_app(db, store());

    let response = get(app, "/projects/99").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Project not found");
}

#[tokio::test]
async fn advance_moves_draft_to_editor_review() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![project_model(5, "draft")],
                vec![project_model(5, "editor_review")],
            ])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = post_empty(app, "/projects/5/advance").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "editor_review");

    let sql = executed_sql(db);
    assert!(sql.contains("\"editor_review\""));
    assert!(sql.contains("Status changed to Editor Review"));
}

#[tokio::test]
async fn advance_from_legacy_in_progress_goes_to_editor_review() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![project_model(6, "in_progress")],
                vec![project_model(6, "editor_review")],
            ])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = post_empty(app, "/projects/6/advance").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(executed_sql(db).contains("\"editor_review\""));
}

#[tokio::test]
async fn advance_is_a_no_op_once_final_delivered() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(8, "final_delivered")]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = post_empty(app, "/projects/8/advance").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "final_delivered");
    assert!(body["actions"]["advance_to"].is_null());

    // Only the initial lookup; nothing is written.
    assert_eq!(common::transaction_log(db).len(), 1);
}

#[tokio::test]
async fn request_changes_outside_review_is_rejected() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(4, "draft")]])
            .into_connection(),
    );
    let app = common::build_test_app(db, store());

    let response = send_json(
        app,
        Method::POST,
        "/projects/4/request-changes",
        json!({ "feedback": "Tighten the intro" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn request_changes_during_client_review_stores_feedback() {
    let mut revised = project_model(4, "needs_revision");
    revised.feedback = Some("Tighten the intro".to_string());
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(4, "client_review")], vec![revised]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = send_json(
        app,
        Method::POST,
        "/projects/4/request-changes",
        json!({ "feedback": "  Tighten the intro  " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "needs_revision");
    assert_eq!(body["feedback"], "Tighten the intro");

    let sql = executed_sql(db);
    assert!(sql.contains("\"needs_revision\""));
    assert!(sql.contains("\"Tighten the intro\""));
}

#[tokio::test]
async fn request_changes_accepts_an_empty_body() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![project_model(4, "editor_review")],
                vec![project_model(4, "needs_revision")],
            ])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = post_empty(app, "/projects/4/request-changes").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "needs_revision");
    assert!(body["feedback"].is_null());
    assert!(executed_sql(db).contains("\"needs_revision\""));
}

#[tokio::test]
async fn set_status_accepts_any_current_status() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![project_model(2, "draft")],
                vec![project_model(2, "approved")],
            ])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = send_json(
        app,
        Method::PUT,
        "/projects/2/status",
        json!({ "status": "approved" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "approved");
    assert!(executed_sql(db).contains("Status changed to Approved"));
}

#[tokio::test]
async fn set_status_rejects_legacy_names() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = common::build_test_app(db, store());

    let response = send_json(
        app,
        Method::PUT,
        "/projects/2/status",
        json!({ "status": "in_progress" }),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn list_projects_returns_newest_first_page() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                project_model(9, "approved"),
                project_model(7, "in_progress"),
            ]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = get(app, "/projects?status=draft&limit=500").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["status"], "draft");

    let sql = executed_sql(db);
    assert!(sql.contains("\"in_progress\""), "draft filter matches legacy rows");
    assert!(sql.contains("LIMIT"));
}

#[tokio::test]
async fn delete_project_removes_stored_objects() {
    let file = common::file_model("f-1", 11, "cut.mp4", "1.0", true);
    let store = Arc::new(MemoryObjectStore::new().with_object(&file.s3_key, b"video"));
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(11, "draft")]])
            .append_query_results([vec![file]])
            .append_exec_results([exec_ok(1)])
            .into_connection(),
    );
    let app = common::build_test_app(db, store.clone());

    let response = common::delete(app, "/projects/11").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["files_removed"], 1);
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn delete_unknown_project_is_404() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection(),
    );
    let store = Arc::new(MemoryObjectStore::new().with_object("projects/404/x-keep.pdf", b"x"));
    let app = common::build_test_app(db, store.clone());

    let response = common::delete(app, "/projects/404").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.keys(), vec!["projects/404/x-keep.pdf".to_string()]);
}
