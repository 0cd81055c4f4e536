use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::null_as_default;

/// Icon keys understood by both the admin editor and the public footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SocialIcon {
    Github,
    Linkedin,
    Twitter,
    Mail,
    #[default]
    Globe,
    Facebook,
    Instagram,
    Youtube,
}

impl SocialIcon {
    pub const ALL: [SocialIcon; 8] = [
        SocialIcon::Github,
        SocialIcon::Linkedin,
        SocialIcon::Twitter,
        SocialIcon::Mail,
        SocialIcon::Globe,
        SocialIcon::Facebook,
        SocialIcon::Instagram,
        SocialIcon::Youtube,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SocialIcon::Github => "Github",
            SocialIcon::Linkedin => "Linkedin",
            SocialIcon::Twitter => "Twitter",
            SocialIcon::Mail => "Mail",
            SocialIcon::Globe => "Globe",
            SocialIcon::Facebook => "Facebook",
            SocialIcon::Instagram => "Instagram",
            SocialIcon::Youtube => "Youtube",
        }
    }

    /// Unknown names fall back to the globe icon
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|icon| icon.name() == name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialItem {
    pub id: i64,
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<OffsetDateTime>,
}

impl SocialItem {
    pub fn icon(&self) -> SocialIcon {
        SocialIcon::from_name(&self.icon_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialInput {
    pub platform: String,
    pub url: String,
    pub icon_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_lookup_falls_back_to_globe() {
        assert_eq!(SocialIcon::from_name("Github"), SocialIcon::Github);
        assert_eq!(SocialIcon::from_name("Mastodon"), SocialIcon::Globe);
        // keys are case sensitive, matching the editor's picker
        assert_eq!(SocialIcon::from_name("github"), SocialIcon::Globe);
    }
}
