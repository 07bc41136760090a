use serde::{Deserialize, Serialize};
use serde_json::Value;

const FALLBACK_ERROR_MESSAGE: &str = "transform failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failure,
}

/// Reply sent back to CloudFormation.
///
/// Build it with [`success`](Self::success) or [`failure`](Self::failure):
/// a `SUCCESS` always carries a fragment and a `FAILURE` always carries a
/// non-empty message, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    request_id: String,
    status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fragment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl TransformResponse {
    pub fn success(request_id: impl Into<String>, fragment: Value) -> Self {
        Self {
            request_id: request_id.into(),
            status: Status::Success,
            fragment: Some(fragment),
            error_message: None,
        }
    }

    pub fn failure(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            request_id: request_id.into(),
            status: Status::Failure,
            fragment: None,
            error_message: Some(message),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn fragment(&self) -> Option<&Value> {
        self.fragment.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
