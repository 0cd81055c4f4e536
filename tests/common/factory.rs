use serde_json::{json, Value};
use uuid::Uuid;

use folio_cms::backend::{tables, Backend};
use folio_cms::models::{ExperienceItem, Project, SocialItem};

use super::TestApp;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    app: &'a TestApp,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(app: &'a TestApp) -> Self {
        Self { app }
    }

    /// Register an operator and sign them in
    pub async fn create_operator(&self) -> TestAuth {
        let email = format!("owner-{}@example.com", Uuid::new_v4());
        let password = "TestPassword123!";

        let user = self.app.backend.register_user(&email, password).await;
        let session = self.app.backend.sign_in(&email, password).await.unwrap();

        TestAuth {
            user_id: user.id,
            email,
            password: password.to_string(),
            token: session.access_token,
        }
    }

    /// Insert a project row directly, bypassing the admin API
    pub async fn create_project(&self, title: &str, category: &str) -> Project {
        let row = json!({
            "title": title,
            "description": format!("{} description", title),
            "long_description": "",
            "image": format!("/assets/{}.png", title.to_lowercase().replace(' ', "-")),
            "images": [],
            "tags": ["Rust"],
            "category": category,
            "github_link": null,
            "live_link": null,
            "featured": false
        });
        self.seed_one(tables::PROJECTS, row).await
    }

    pub async fn create_experience(&self, year: &str, title: &str, company: &str) -> ExperienceItem {
        let row = json!({
            "year": year,
            "title": title,
            "company": company,
            "type": "work",
            "description": format!("{} at {}", title, company),
            "skills": ["Rust", "SQL"]
        });
        self.seed_one(tables::EXPERIENCE, row).await
    }

    pub async fn create_social(&self, platform: &str, url: &str, icon_name: &str) -> SocialItem {
        let row = json!({
            "platform": platform,
            "url": url,
            "icon_name": icon_name
        });
        self.seed_one(tables::SOCIALS, row).await
    }

    /// Store a section row directly
    pub async fn create_section(&self, key: &str, content: Value) -> Value {
        let mut rows = self
            .app
            .backend
            .seed(
                tables::SITE_CONTENT,
                vec![json!({"section_key": key, "content": content, "updated_at": null})],
            )
            .await;
        rows.remove(0)
    }

    async fn seed_one<T: serde::de::DeserializeOwned>(&self, table: &str, row: Value) -> T {
        let mut rows = self.app.backend.seed(table, vec![row]).await;
        serde_json::from_value(rows.remove(0)).unwrap()
    }
}
