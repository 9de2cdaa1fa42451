use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Outcome of the OAuth redirect the provider sends the user back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Token(String),
    Unauthorized,
    Invalid,
}

/// Bearer-token session. The token lives in memory and is mirrored to a
/// cache file so a restart stays logged in.
pub struct AuthSession {
    token: RwLock<Option<String>>,
    token_file: PathBuf,
}

impl AuthSession {
    /// Loads any cached token from `token_file`.
    pub fn load(token_file: PathBuf) -> Self {
        let token = fs::read_to_string(&token_file)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|t| !t.is_empty());

        if token.is_some() {
            tracing::debug!("Restored session token from {}", token_file.display());
        }

        Self {
            token: RwLock::new(token),
            token_file,
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    pub fn set_token(&self, token: String) {
        if let Some(parent) = self.token_file.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(err) = fs::write(&self.token_file, &token) {
            tracing::warn!("Failed to cache session token: {err}");
        }
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    pub fn clear_token(&self) {
        if self.token_file.exists() {
            if let Err(err) = fs::remove_file(&self.token_file) {
                tracing::warn!("Failed to remove cached token: {err}");
            }
        }
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// URL the browser must visit to start the Google login flow.
    pub fn google_login_url(&self, base_url: &str) -> String {
        format!("{base_url}/auth/google")
    }

    /// Best-effort server notify, then local clear. A failed notify still
    /// ends the local session.
    pub async fn logout(&self, base_url: &str) {
        if let Some(token) = self.get_token() {
            let result = reqwest::Client::new()
                .post(format!("{base_url}/auth/logout"))
                .bearer_auth(&token)
                .send()
                .await;
            if let Err(err) = result {
                tracing::warn!("Logout notify failed: {err}");
            }
        }
        self.clear_token();
    }
}

/// Parses the redirect URL pasted back after the provider round-trip.
/// Accepts a `token` parameter or `error=unauthorized`.
pub fn parse_callback(raw: &str) -> Callback {
    let url = match reqwest::Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(_) => return Callback::Invalid,
    };

    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" if !value.is_empty() => return Callback::Token(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match error.as_deref() {
        Some("unauthorized") => Callback::Unauthorized,
        _ => Callback::Invalid,
    }
}
