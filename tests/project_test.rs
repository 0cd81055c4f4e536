mod common;

use axum::http::StatusCode;
use folio_cms::backend::{tables, Operation};
use serde_json::json;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_create_project() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .post("/api/admin/projects")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Pharmacy Chat Bot",
            "description": "Answers medication questions",
            "tags_input": "React, Node.js ,  , AI",
            "images_input": "/assets/a.png\n\n/assets/b.png\n",
            "category": "AI",
            "github_link": "https://github.com/owner/bot",
            "live_link": "",
            "featured": true
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["data"]["id"].as_i64().is_some());
    assert_eq!(body["data"]["title"], "Pharmacy Chat Bot");
    assert_eq!(body["data"]["tags"], json!(["React", "Node.js", "AI"]));
    assert_eq!(body["data"]["images"], json!(["/assets/a.png", "/assets/b.png"]));
    assert_eq!(body["data"]["featured"], true);
    assert!(body["data"]["live_link"].is_null());
    assert_eq!(body["hints"], json!([]));
    assert_eq!(body["notice"], "Saved successfully!");

    assert_eq!(app.backend.rows(tables::PROJECTS).await.len(), 1);
}

#[tokio::test]
async fn test_create_project_missing_required_fields() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .post("/api/admin/projects")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "  ",
            "tags_input": "Rust"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["details"],
        "Missing required fields: title, description"
    );
    assert!(app.backend.rows(tables::PROJECTS).await.is_empty());
}

#[tokio::test]
async fn test_create_project_returns_link_hints() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .post("/api/admin/projects")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Quant",
            "description": "Trading research",
            "github_link": "github.com/owner/quant",
            "category": "Finance"
        }))
        .await;

    // hints never block the save
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let hints = body["hints"].as_array().unwrap();
    assert_eq!(hints.len(), 2);
    assert_eq!(body["data"]["github_link"], "github.com/owner/quant");
    assert_eq!(body["data"]["category"], "Finance");
}

#[tokio::test]
async fn test_list_projects_with_search() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    factory.create_project("Pharmacy Chat Bot", "AI").await;
    factory.create_project("Perfumexcella", "Web").await;
    factory.create_project("Metabolic Health App", "Mobile").await;

    let response = app
        .server
        .get("/api/admin/projects")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 3);
    assert!(body.get("error").is_none());

    // title or category, case-insensitive
    let response = app
        .server
        .get("/api/admin/projects")
        .add_query_param("search", "PHARMACY")
        .add_header("Authorization", auth.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Pharmacy Chat Bot");

    let response = app
        .server
        .get("/api/admin/projects")
        .add_query_param("search", "mobile")
        .add_header("Authorization", auth.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Metabolic Health App");
}

#[tokio::test]
async fn test_list_projects_fetch_failure() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;
    app.backend
        .fail_on(Operation::Select, tables::PROJECTS, 0, "connection reset")
        .await;

    let response = app
        .server
        .get("/api/admin/projects")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "connection reset");
}

#[tokio::test]
async fn test_new_project_draft_defaults() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .get("/api/admin/projects/new")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["title"], "");
    assert_eq!(body["draft"]["category"], "Web");
    assert_eq!(body["draft"]["featured"], false);
    assert_eq!(
        body["categories"],
        json!(["Web", "Mobile", "AI", "Cybersecurity", "Other"])
    );
}

#[tokio::test]
async fn test_edit_project_draft_joins_lists() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    let stored = app
        .backend
        .seed(
            tables::PROJECTS,
            vec![json!({
                "title": "Too Sabi",
                "description": "Quiz app",
                "images": ["/a.png", "/b.png"],
                "tags": ["Flutter", "Firebase"],
                "category": "Mobile",
                "github_link": null
            })],
        )
        .await;
    let id = stored[0]["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/api/admin/projects/{}/form", id))
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["draft"]["title"], "Too Sabi");
    assert_eq!(body["draft"]["tags_input"], "Flutter, Firebase");
    assert_eq!(body["draft"]["images_input"], "/a.png\n/b.png");
    assert_eq!(body["draft"]["github_link"], "");
}

#[tokio::test]
async fn test_edit_project_draft_not_found() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .get("/api/admin/projects/999/form")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_project_replaces_fields() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    let project = factory.create_project("True-North", "Web").await;

    let response = app
        .server
        .put(&format!("/api/admin/projects/{}", project.id))
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "True North",
            "description": "Navigation for founders",
            "tags_input": "Next.js",
            "category": "Web"
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["id"], project.id);
    assert_eq!(body["data"]["title"], "True North");
    assert_eq!(body["data"]["tags"], json!(["Next.js"]));
    // whole-record write: omitted fields are cleared
    assert_eq!(body["data"]["image"], "");
    assert_eq!(body["notice"], "Saved successfully!");
    assert_eq!(app.backend.rows(tables::PROJECTS).await.len(), 1);
}

#[tokio::test]
async fn test_update_missing_project() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app).create_operator().await;

    let response = app
        .server
        .put("/api/admin/projects/42")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "title": "Ghost",
            "description": "Never stored"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_project_requires_confirmation() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    let project = factory.create_project("Quant", "Other").await;

    let response = app
        .server
        .delete(&format!("/api/admin/projects/{}", project.id))
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Confirmation required");
    assert_eq!(
        body["details"],
        "Are you sure you want to delete this project?"
    );

    let response = app
        .server
        .delete(&format!("/api/admin/projects/{}", project.id))
        .add_query_param("confirm", "false")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.backend.rows(tables::PROJECTS).await.len(), 1);
}

#[tokio::test]
async fn test_delete_project_returns_refreshed_list() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    factory.create_project("One", "Web").await;
    let two = factory.create_project("Two", "Web").await;
    factory.create_project("Three", "Web").await;

    let response = app
        .server
        .delete(&format!("/api/admin/projects/{}", two.id))
        .add_query_param("confirm", "true")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["title"], "Three");
    assert_eq!(body["data"][1]["title"], "One");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_delete_project_refetch_failure_is_reported() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    let project = factory.create_project("Doomed", "Web").await;
    app.backend
        .fail_on(Operation::Select, tables::PROJECTS, 0, "timeout")
        .await;

    let response = app
        .server
        .delete(&format!("/api/admin/projects/{}", project.id))
        .add_query_param("confirm", "true")
        .add_header("Authorization", auth.auth_header())
        .await;

    // the delete itself went through
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "timeout");
    assert!(app.backend.rows(tables::PROJECTS).await.is_empty());
}

#[tokio::test]
async fn test_delete_project_backend_failure() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    let auth = factory.create_operator().await;
    let project = factory.create_project("Sticky", "Web").await;
    app.backend
        .fail_on(Operation::Delete, tables::PROJECTS, 0, "permission denied")
        .await;

    let response = app
        .server
        .delete(&format!("/api/admin/projects/{}", project.id))
        .add_query_param("confirm", "true")
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "permission denied");
    assert_eq!(app.backend.rows(tables::PROJECTS).await.len(), 1);
}
