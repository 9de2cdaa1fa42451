use serde::Deserialize;

/// Failure classification for every backend call. Nothing below this
/// layer swallows an error; callers decide what surfaces.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Validation failed: {}", messages.join(" "))]
    Validation { messages: Vec<String> },

    #[error("Not found: {id}")]
    NotFound { id: String },

    #[error("Session expired")]
    Auth,
}

impl ApiError {
    /// User-visible message. Backend validation messages are joined with
    /// a space when there are several.
    pub fn surface_message(&self) -> String {
        match self {
            ApiError::Validation { messages } if !messages.is_empty() => messages.join(" "),
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Error body the backend sends on non-2xx: `message` is a string or a
/// list of field-level strings.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<MessageField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

impl MessageField {
    fn into_messages(self) -> Vec<String> {
        match self {
            MessageField::One(msg) => vec![msg],
            MessageField::Many(msgs) => msgs,
        }
    }
}

/// Map a non-2xx status plus raw body to the taxonomy. `entity_id` is
/// set for single-entity routes so a 404 names what was missing.
pub(crate) fn classify(status: u16, body: &str, entity_id: Option<&str>) -> ApiError {
    let messages = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(MessageField::into_messages)
        .unwrap_or_default();

    match status {
        401 => ApiError::Auth,
        404 if entity_id.is_some() => ApiError::NotFound {
            id: entity_id.unwrap_or_default().to_string(),
        },
        400 | 422 if !messages.is_empty() => ApiError::Validation { messages },
        _ => ApiError::Server {
            status,
            message: messages.join(" "),
        },
    }
}
