use std::time::Duration;

use notemark_core::policy::DEFAULT_FAVICON_TEMPLATE;

use crate::FetchSettings;

pub const DEFAULT_API_BASE: &str = "https://www.notion.so/api/v3";

#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub fetch: FetchSettings,
    /// Courtesy delay after every target, success or failure.
    pub pause_between_targets: Duration,
    pub favicon_template: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            pause_between_targets: Duration::from_millis(800),
            favicon_template: DEFAULT_FAVICON_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub api_base: String,
    pub request_timeout: Duration,
    /// Forwarded as the `token_v2` cookie when present.
    pub session_token: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            session_token: None,
        }
    }
}
