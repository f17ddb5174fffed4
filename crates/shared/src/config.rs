use std::env;

use tracing::debug;

/// Name sent in the User-Agent header and written as the feed generator.
pub const PROJECT_NAME: &str = "OpenAlexTopicRSS";

pub const DEFAULT_CONTACT_EMAIL: &str = "contact@example.org";
pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub contact_email: String,
    pub openalex_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            openalex_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let contact_email = env::var("CONTACT_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string());

        let openalex_base_url = env::var("OPENALEX_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            contact_email,
            openalex_base_url,
        }
    }

    /// OpenAlex asks callers to identify themselves with a project name and a
    /// contact address.
    pub fn user_agent(&self) -> String {
        format!("{} ({})", PROJECT_NAME, self.contact_email)
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            debug!("loaded .env from current directory");
            return;
        }

        // 2. ~/.config/topic-feeds/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("topic-feeds").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                debug!(path = %config_path.display(), "loaded .env");
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() && dotenvy::from_path(&home_path).is_ok() {
                debug!(path = %home_path.display(), "loaded .env");
            }
        }

        // Nothing found is fine: CONTACT_EMAIL may be set in the environment
        // or left at its placeholder.
    }
}
