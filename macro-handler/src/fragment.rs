use serde_json::{Map, Value};

use crate::error::TransformError;

const RESOURCES: &str = "Resources";

/// Checks the structure CloudFormation expects back from a macro.
///
/// Any JSON value is acceptable except `null`. When the fragment is an object
/// with a `Resources` section, every entry there must be an object with a
/// non-empty string `Type` and an object `Properties`.
pub fn validate_fragment(fragment: &Value) -> Result<(), TransformError> {
    if fragment.is_null() {
        return Err(TransformError::InvalidFragment(
            "transform produced no fragment".to_string(),
        ));
    }

    let Some(resources) = fragment.get(RESOURCES) else {
        return Ok(());
    };

    let resources = resources.as_object().ok_or_else(|| {
        TransformError::InvalidFragment("Resources must be an object".to_string())
    })?;

    for (logical_id, resource) in resources {
        validate_resource(logical_id, resource)?;
    }

    Ok(())
}

fn validate_resource(logical_id: &str, resource: &Value) -> Result<(), TransformError> {
    let invalid = |reason: &str| TransformError::InvalidFragment(format!("resource {logical_id} {reason}"));

    let resource = resource.as_object().ok_or_else(|| invalid("must be an object"))?;

    match resource.get("Type").and_then(Value::as_str) {
        Some(kind) if !kind.is_empty() => {}
        _ => return Err(invalid("is missing a Type")),
    }

    if !resource.get("Properties").is_some_and(Value::is_object) {
        return Err(invalid("is missing Properties"));
    }

    Ok(())
}

/// Mutable access to the `Resources` section of a fragment, creating it when
/// absent. A `null` fragment is turned into an empty object first.
pub fn resources_mut(fragment: &mut Value) -> Result<&mut Map<String, Value>, TransformError> {
    if fragment.is_null() {
        *fragment = Value::Object(Map::new());
    }

    let root = fragment.as_object_mut().ok_or_else(|| {
        TransformError::InvalidFragment("fragment must be an object".to_string())
    })?;

    root.entry(RESOURCES)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| TransformError::InvalidFragment("Resources must be an object".to_string()))
}
