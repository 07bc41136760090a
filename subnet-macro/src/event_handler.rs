use macro_handler::{
    async_trait, resources_mut, Transform, TransformError, TransformRequest,
};
use serde_json::{json, Map, Value};

use crate::config::{check_cidr, SubnetDefaults};

const DEFAULT_LOGICAL_ID: &str = "MySubnet";

/// Adds an `AWS::EC2::Subnet` to the fragment it is given.
///
/// Parameters: `VpcId` (required), `CidrBlock`, `LogicalId`,
/// `AvailabilityZone`. Existing resources are kept as they are.
pub struct SubnetTransform {
    defaults: SubnetDefaults,
}

impl SubnetTransform {
    pub fn new(defaults: SubnetDefaults) -> Self {
        Self { defaults }
    }

    fn subnet_resource(&self, request: &TransformRequest, logical_id: &str) -> Result<Value, TransformError> {
        let vpc_id = request
            .param("VpcId")
            .cloned()
            .ok_or_else(|| TransformError::MissingParameter("VpcId".to_string()))?;

        let cidr_block = request
            .string_param("CidrBlock")?
            .unwrap_or(self.defaults.cidr_block.as_str());
        check_cidr(cidr_block).map_err(|reason| TransformError::invalid_parameter("CidrBlock", reason))?;

        let mut properties = Map::new();
        properties.insert("VpcId".to_string(), vpc_id);
        properties.insert("CidrBlock".to_string(), json!(cidr_block));
        if let Some(zone) = request.string_param("AvailabilityZone")? {
            properties.insert("AvailabilityZone".to_string(), json!(zone));
        }
        properties.insert(
            "Tags".to_string(),
            json!([{"Key": "Name", "Value": logical_id}]),
        );

        Ok(json!({
            "Type": "AWS::EC2::Subnet",
            "Properties": properties
        }))
    }
}

#[async_trait]
impl Transform for SubnetTransform {
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError> {
        let logical_id = request
            .string_param("LogicalId")?
            .unwrap_or(DEFAULT_LOGICAL_ID);
        if logical_id.is_empty() || !logical_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TransformError::invalid_parameter(
                "LogicalId",
                "must be non-empty and alphanumeric",
            ));
        }

        let subnet = self.subnet_resource(request, logical_id)?;

        let mut fragment = request.fragment.clone();
        let resources = resources_mut(&mut fragment)?;
        if resources.contains_key(logical_id) {
            return Err(TransformError::InvalidFragment(format!(
                "resource {logical_id} already exists"
            )));
        }
        resources.insert(logical_id.to_string(), subnet);

        tracing::debug!(logical_id, region = %request.region, "added subnet");

        Ok(fragment)
    }
}
