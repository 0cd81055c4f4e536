mod common;

use axum::http::StatusCode;
use folio_cms::backend::{tables, Operation};
use serde_json::json;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_health_reports_backend_configuration() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend_configured"], false);
}

#[tokio::test]
async fn test_gallery_lists_newest_first() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    factory.create_project("Older", "Web").await;
    factory.create_project("Newer", "AI").await;

    let response = app.server.get("/api/projects").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["title"], "Newer");
    assert_eq!(body["data"][1]["title"], "Older");
}

#[tokio::test]
async fn test_gallery_filters_by_exact_category() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    factory.create_project("Chat Bot", "AI").await;
    factory.create_project("Storefront", "Web").await;

    let response = app.server.get("/api/projects").add_query_param("category", "AI").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Chat Bot");

    // category match is exact
    let response = app.server.get("/api/projects").add_query_param("category", "ai").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0);

    let response = app.server.get("/api/projects").add_query_param("category", "All").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_gallery_degrades_to_empty_when_fetch_fails() {
    let app = TestApp::new().await;
    Factory::new(&app).create_project("Hidden", "Web").await;
    app.backend
        .fail_on(Operation::Select, tables::PROJECTS, 0, "connection reset")
        .await;

    let response = app.server.get("/api/projects").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_timeline_orders_year_as_text() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    factory.create_experience("2023", "Engineer", "Acme").await;
    factory.create_experience("2024 - Present", "Lead", "Initech").await;
    factory.create_experience("2024", "Senior Engineer", "Acme").await;

    let response = app.server.get("/api/experience").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    let years: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["year"].as_str().unwrap())
        .collect();
    assert_eq!(years, vec!["2024 - Present", "2024", "2023"]);
    assert_eq!(body["data"][0]["type"], "work");
}

#[tokio::test]
async fn test_timeline_keeps_rows_with_null_columns() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    factory.create_experience("2023", "Engineer", "Acme").await;
    app.backend
        .seed(
            tables::EXPERIENCE,
            vec![json!({
                "year": "2021",
                "title": "Volunteer",
                "company": "Food Bank",
                "type": null,
                "description": null,
                "skills": null
            })],
        )
        .await;

    let response = app.server.get("/api/experience").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][1]["title"], "Volunteer");
    assert_eq!(body["data"][1]["type"], "work");
    assert_eq!(body["data"][1]["skills"], json!([]));
}

#[tokio::test]
async fn test_footer_links_resolve_unknown_icons_to_globe() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app);
    factory
        .create_social("GitHub", "https://github.com/owner", "Github")
        .await;
    factory
        .create_social("Mastodon", "https://mastodon.social/@owner", "Mastodon")
        .await;

    let response = app.server.get("/api/socials").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"][0]["platform"], "GitHub");
    assert_eq!(body["data"][0]["icon"], "Github");
    assert_eq!(body["data"][1]["icon"], "Globe");
}

#[tokio::test]
async fn test_section_content_falls_back_per_field() {
    let app = TestApp::new().await;
    Factory::new(&app)
        .create_section("hero", json!({"name": "Ada", "cta_primary": "  "}))
        .await;

    let response = app.server.get("/api/content/hero").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["section_key"], "hero");
    assert_eq!(body["content"]["name"], "Ada");
    assert_eq!(body["content"]["badge"], "Hi, I'm");
    assert_eq!(body["content"]["cta_primary"], "View My Work");
}

#[tokio::test]
async fn test_section_content_without_row_uses_fallbacks() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/content/about").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["content"]["image"], "/assets/about.png");
}

#[tokio::test]
async fn test_unknown_section_not_found() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/content/pricing").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
