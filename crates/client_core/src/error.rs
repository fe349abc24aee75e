use shared::{domain::PostId, error::ApiError};
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub status_code: Option<u16>,
    pub server_message: Option<String>,
    pub transport_message: String,
}

impl RequestError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            server_message: None,
            transport_message: message.into(),
        }
    }

    pub fn from_status(status: u16, reason: Option<&str>, body: &str) -> Self {
        let transport_message = match reason {
            Some(reason) => format!("request failed with status {status} {reason}"),
            None => format!("request failed with status {status}"),
        };
        Self {
            status_code: Some(status),
            server_message: server_message_from_body(body),
            transport_message,
        }
    }

    pub fn decode(status: u16, what: &str, source: impl std::fmt::Display) -> Self {
        Self {
            status_code: Some(status),
            server_message: None,
            transport_message: format!("invalid {what} payload from server: {source}"),
        }
    }

    pub fn log_message(&self) -> String {
        match &self.server_message {
            Some(message) => message.clone(),
            None => self.transport_message.clone(),
        }
    }

    pub fn log(&self, operation: &str) {
        error!(
            operation,
            status_code = ?self.status_code,
            server_message = ?self.server_message,
            transport_message = %self.transport_message,
            "{}",
            self.log_message()
        );
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.log_message())
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        Self {
            status_code: value.status().map(|status| status.as_u16()),
            server_message: None,
            transport_message: value.to_string(),
        }
    }
}

fn server_message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return Some(api_error.message);
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Null) => None,
        Ok(serde_json::Value::String(text)) => Some(text),
        Ok(value) => Some(value.to_string()),
        Err(_) => Some(body.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no editor is open")]
    EditorClosed,
    #[error("post {0} is not the post being edited")]
    NotEditing(PostId),
    #[error("no post id left for a new post")]
    IdsExhausted,
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl SubmitError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn request(&self) -> Option<&RequestError> {
        match self {
            Self::Request(err) => Some(err),
            _ => None,
        }
    }
}
