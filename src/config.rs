/// Backend used when `ECOPROMPT_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Client configuration, baked in at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(option_env!("ECOPROMPT_API_URL"), option_env!("ECOPROMPT_LOG"))
    }

    /// Build a config from optional overrides. Blank values fall back to defaults.
    pub fn from_values(api_base_url: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string();

        Self {
            api_base_url,
            log_level,
        }
    }

    /// Absolute URL for an API path such as `/prompt-optimize`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
