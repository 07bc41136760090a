//! Building blocks for CloudFormation macro functions.
//!
//! A macro implements [`Transform`]; [`MacroHandler`] wraps it so every
//! invocation answers with a well-formed [`TransformResponse`].

pub mod error;
pub mod fragment;
pub mod handler;
pub mod logging;
pub mod request;
pub mod response;

pub use error::TransformError;
pub use fragment::{resources_mut, validate_fragment};
pub use handler::{transform_fn, FnTransform, MacroHandler, Transform};
pub use logging::init_logging;
pub use request::TransformRequest;
pub use response::{Status, TransformResponse};

pub use async_trait::async_trait;
