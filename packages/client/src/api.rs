//! API request and response models for the TaskMaster REST API

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login response from `POST /token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Login form fields; the API names the email field `username`
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Registration payload for `POST /signup`
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Account returned by a successful signup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Error payload of a non-2xx response.
///
/// `detail` is either a message string or a list of field errors, each
/// carrying a `msg`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Human-readable message from the body, if it carries one
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.trim().is_empty() => Some(detail.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            Some(Value::Null) | None => self.message.clone().filter(|m| !m.trim().is_empty()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Message for a failed response: the server's detail when present, else a
    /// plain-text body, else the status reason
    pub fn detail_from(body: &str, status: StatusCode) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message() {
                return message;
            }
        }

        let trimmed = body.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<') {
            return trimmed.to_string();
        }

        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
    }
}
