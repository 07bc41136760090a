use thiserror::Error;

/// Everything that can turn a macro invocation into a `FAILURE` response.
///
/// The `Display` output is shown to the template author by CloudFormation,
/// so messages stay short and free of internal detail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("missing requestId")]
    MissingRequestId,

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("missing required parameter {0}")]
    MissingParameter(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid fragment: {0}")]
    InvalidFragment(String),

    #[error("{0}")]
    Logic(String),

    #[error("transform panicked: {0}")]
    Panicked(String),
}

impl TransformError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Coarse bucket used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::MissingRequestId | TransformError::MalformedRequest(_) => "validation",
            _ => "transform",
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::MalformedRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(TransformError::MissingRequestId.to_string(), "missing requestId");
        assert_eq!(
            TransformError::invalid_parameter("CidrBlock", "not a CIDR").to_string(),
            "invalid parameter CidrBlock: not a CIDR"
        );
        assert_eq!(
            TransformError::Logic("boom".into()).to_string(),
            "boom"
        );
    }

    #[test]
    fn kind_splits_validation_from_transform() {
        assert_eq!(TransformError::MissingRequestId.kind(), "validation");
        assert_eq!(TransformError::MalformedRequest("x".into()).kind(), "validation");
        assert_eq!(TransformError::MissingParameter("VpcId".into()).kind(), "transform");
        assert_eq!(TransformError::Panicked("x".into()).kind(), "transform");
    }
}
