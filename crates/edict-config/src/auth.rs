use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where the bearer token is cached between runs.
    pub token_file: PathBuf,
}

impl AuthConfig {
    pub fn new() -> Self {
        let token_file = env::var("EDICT_TOKEN_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("edict")
                .join("token")
        });

        Self { token_file }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
