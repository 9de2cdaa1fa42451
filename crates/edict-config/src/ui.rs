use std::env;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows the words screen renders at once.
    pub viewport_rows: usize,
}

impl UiConfig {
    pub fn new() -> Self {
        let viewport_rows = env::var("EDICT_VIEWPORT_ROWS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self { viewport_rows }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}
