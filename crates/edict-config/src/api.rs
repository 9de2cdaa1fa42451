use std::env;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin + base path of the Edict backend, no trailing slash.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn new() -> Self {
        let base_url = env::var("EDICT_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout_seconds = env::var("EDICT_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            base_url,
            timeout_seconds,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}
