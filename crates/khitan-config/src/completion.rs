use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    /// Completion service credential, usually supplied via environment
    #[serde(default)]
    pub api_key: String,
    /// OpenAI-compatible base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl CompletionConfig {
    pub fn new() -> Self {
        let api_key = env::var("DEEPSEEK_API_KEY").unwrap_or_default();

        let api_url = env::var("COMPLETION_API_URL").unwrap_or_else(|_| default_api_url());

        let model = env::var("COMPLETION_MODEL").unwrap_or_else(|_| default_model());

        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            api_key,
            api_url,
            model,
            temperature: default_temperature(),
            timeout_seconds,
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
