//! Integration tests for the client and editor directories.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    body_json, client_model, editor_model, exec_ok, executed_sql, get, project_model, send_json,
    MemoryObjectStore,
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;

use content_tracker::entities::client;

fn store() -> Arc<MemoryObjectStore> {
    Arc::new(MemoryObjectStore::new())
}

#[tokio::test]
async fn create_client_defaults_created_date_to_today() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![client_model(1)]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = send_json(
        app,
        Method::POST,
        "/clients",
        json!({ "name": "Dana Reyes", "email": "dana@acme.test", "company": "Acme Co" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["company"], "Acme Co");

    let today = chrono::Utc::now().date_naive().to_string();
    assert!(executed_sql(db).contains(&today));
}

#[tokio::test]
async fn create_client_rejects_bad_email() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let app = common::build_test_app(db, store());

    let response = send_json(
        app,
        Method::POST,
        "/clients",
        json!({ "name": "Dana", "email": "dana-at-acme", "company": "Acme Co" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["details"],
        json!(["email must be a valid email address"])
    );
}

#[tokio::test]
async fn client_projects_match_on_company() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![client_model(1)]])
            .append_query_results([vec![project_model(4, "client_review")]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = get(app, "/clients/1/projects").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["client"], "Acme Co");
    assert!(executed_sql(db).contains("\"Acme Co\""));
}

#[tokio::test]
async fn missing_client_is_404() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<client::Model>::new()])
            .into_connection(),
    );
    let app = common::build_test_app(db, store());

    let response = get(app, "/clients/12").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_client_leaves_projects_alone() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(1)])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = common::delete(app, "/clients/1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let sql = executed_sql(db);
    assert!(sql.contains("DELETE FROM \\\"clients\\\""));
    assert!(!sql.contains("projects"));
}

#[tokio::test]
async fn new_editor_is_active_by_default() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![editor_model(1)]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = send_json(
        app,
        Method::POST,
        "/editors",
        json!({ "name": "Sam Okafor", "email": "sam@studio.test", "timezone": "Europe/Lisbon" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["is_active"], true);
    assert!(executed_sql(db).contains("Bool(Some(true))"));
}

#[tokio::test]
async fn list_editors_orders_by_name() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![editor_model(2), editor_model(1)]])
            .into_connection(),
    );
    let app = common::build_test_app(db.clone(), store());

    let response = get(app, "/editors").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    assert!(executed_sql(db).contains("ORDER BY \\\"editors\\\".\\\"name\\\" ASC"));
}
