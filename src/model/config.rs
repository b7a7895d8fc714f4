use serde::{Deserialize, Serialize};

/// Configuration from `config.toml` in the data directory.
/// Everything is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
}

/// Settings for the Gemini advisory gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Falls back to the GEMINI_API_KEY environment variable when unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for tests and proxies
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
