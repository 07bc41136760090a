use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TransformError;

/// Invocation envelope as CloudFormation sends it to a macro function.
///
/// Every field is optional on the wire so that a broken envelope still
/// decodes far enough for the handler to answer with a `FAILURE`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    request_id: Option<String>,
    account_id: Option<String>,
    region: Option<String>,
    #[serde(default)]
    fragment: Value,
    transform_id: Option<String>,
    params: Option<Map<String, Value>>,
    template_parameter_values: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformRequest {
    pub request_id: String,
    pub account_id: String,
    pub region: String,
    /// Template (or template subset) being transformed. `Null` when absent.
    pub fragment: Value,
    pub transform_id: String,
    pub params: Map<String, Value>,
    pub template_parameter_values: Map<String, Value>,
}

impl TransformRequest {
    /// Decodes a raw Lambda payload.
    pub fn from_event(payload: Value) -> Result<Self, TransformError> {
        if !payload.is_object() {
            return Err(TransformError::MalformedRequest(
                "expected a JSON object".to_string(),
            ));
        }

        let envelope: Envelope = serde_json::from_value(payload)?;

        Ok(Self {
            request_id: envelope.request_id.unwrap_or_default(),
            account_id: envelope.account_id.unwrap_or_default(),
            region: envelope.region.unwrap_or_default(),
            fragment: envelope.fragment,
            transform_id: envelope.transform_id.unwrap_or_default(),
            params: envelope.params.unwrap_or_default(),
            template_parameter_values: envelope.template_parameter_values.unwrap_or_default(),
        })
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        if self.request_id.is_empty() {
            return Err(TransformError::MissingRequestId);
        }
        Ok(())
    }

    /// Looks up a transform parameter.
    ///
    /// A value of the form `{"Ref": "Name"}` is replaced by the template
    /// parameter `Name` when the caller supplied it; other references are
    /// returned untouched so they can be emitted into the fragment.
    pub fn param(&self, name: &str) -> Option<&Value> {
        let value = self.params.get(name)?;

        let referenced = value
            .as_object()
            .filter(|obj| obj.len() == 1)
            .and_then(|obj| obj.get("Ref"))
            .and_then(Value::as_str)
            .and_then(|target| self.template_parameter_values.get(target));

        Some(referenced.unwrap_or(value))
    }

    /// Like [`param`](Self::param) but the value must be a string.
    pub fn string_param(&self, name: &str) -> Result<Option<&str>, TransformError> {
        match self.param(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(TransformError::invalid_parameter(name, "expected a string")),
        }
    }
}

/// Best-effort `requestId` extraction for envelopes that failed to decode.
pub fn raw_request_id(payload: &Value) -> &str {
    payload
        .get("requestId")
        .and_then(Value::as_str)
        .unwrap_or_default()
}
