use std::sync::Arc;

use edict_client::AuthSession;
use edict_config::Config;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: RwLock<Config>,
    pub session: Arc<AuthSession>,
}

impl AppState {
    pub fn new(config: Config, session: Arc<AuthSession>) -> Self {
        Self {
            config: RwLock::new(config),
            session,
        }
    }
}
