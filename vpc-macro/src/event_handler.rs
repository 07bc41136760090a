use macro_handler::{async_trait, Transform, TransformError, TransformRequest};
use serde_json::{json, Value};

const VPC_CIDR_BLOCK: &str = "10.1.0.0/16";
const VPC_NAME: &str = "my-vpc";

/// Emits a single VPC resource regardless of the fragment it is given.
pub struct FixedVpc;

#[async_trait]
impl Transform for FixedVpc {
    async fn transform(&self, _request: &TransformRequest) -> Result<Value, TransformError> {
        Ok(json!({
            "Resources": {
                "MyVPC": {
                    "Type": "AWS::EC2::VPC",
                    "Properties": {
                        "CidrBlock": VPC_CIDR_BLOCK,
                        "Tags": [{
                            "Key": "Name",
                            "Value": VPC_NAME
                        }]
                    }
                }
            }
        }))
    }
}
