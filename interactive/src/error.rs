use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The API answered 401. The session is gone and a redirect is underway.
    #[error("session expired")]
    Unauthorized,

    #[error("request rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("could not encode request: {0}")]
    Encode(String),

    #[error("browser error: {0}")]
    Browser(String),
}

impl ApiError {
    /// Text for the error slot next to a form.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Network(_) => "Network error".to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Pull a readable message out of an error body such as
/// `{"detail": "Email already registered"}` or a list of validation errors.
pub fn parse_detail(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<ErrorBody>(body).ok()?.detail?;
    match detail {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}
