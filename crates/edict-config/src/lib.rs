use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::auth::AuthConfig;
use self::ui::UiConfig;

pub mod api;
pub mod auth;
pub mod ui;

#[derive(Default, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            api: ApiConfig::new(),
            auth: AuthConfig::new(),
            ui: UiConfig::new(),
        }
    }
}
