use serde::Deserialize;

/// Typed view of the `AppConfiguration` settings section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppConfiguration {
    pub name: String,
    pub url: String,
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u64,
    #[serde(default)]
    pub contact_recipient: Option<String>,
}

fn default_posts_per_page() -> u64 {
    5
}
