use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::Instrument;

use crate::error::TransformError;
use crate::fragment::validate_fragment;
use crate::request::{raw_request_id, TransformRequest};
use crate::response::TransformResponse;

/// Fragment production hook supplied by each macro.
#[async_trait]
pub trait Transform: Send + Sync + 'static {
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError>;
}

/// Wraps a synchronous closure as a [`Transform`].
pub fn transform_fn<F>(f: F) -> FnTransform<F>
where
    F: Fn(&TransformRequest) -> Result<Value, TransformError> + Send + Sync + 'static,
{
    FnTransform(f)
}

pub struct FnTransform<F>(F);

#[async_trait]
impl<F> Transform for FnTransform<F>
where
    F: Fn(&TransformRequest) -> Result<Value, TransformError> + Send + Sync + 'static,
{
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError> {
        (self.0)(request)
    }
}

/// Runs a [`Transform`] under the macro contract.
///
/// Whatever the transform does, the caller gets exactly one
/// [`TransformResponse`] echoing the request id: errors, invalid fragments
/// and panics all become `FAILURE`.
pub struct MacroHandler<T> {
    transform: Arc<T>,
}

impl<T> Clone for MacroHandler<T> {
    fn clone(&self) -> Self {
        Self {
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<T: Transform> MacroHandler<T> {
    pub fn new(transform: T) -> Self {
        Self {
            transform: Arc::new(transform),
        }
    }

    pub async fn handle(&self, request: TransformRequest) -> TransformResponse {
        let span = tracing::info_span!(
            "transform",
            request_id = %request.request_id,
            transform_id = %request.transform_id,
            account_id = %request.account_id,
            region = %request.region,
        );

        let request_id = request.request_id.clone();

        match self.run(request).instrument(span.clone()).await {
            Ok(fragment) => {
                span.in_scope(|| tracing::info!("transform succeeded"));
                TransformResponse::success(request_id, fragment)
            }
            Err(err) => {
                span.in_scope(|| tracing::warn!(kind = err.kind(), error = %err, "transform failed"));
                TransformResponse::failure(request_id, err.to_string())
            }
        }
    }

    /// Entry point for `lambda_runtime::service_fn`. Never returns `Err`.
    pub async fn handle_event(&self, event: LambdaEvent<Value>) -> Result<TransformResponse, Error> {
        let request_id = raw_request_id(&event.payload).to_string();

        match TransformRequest::from_event(event.payload) {
            Ok(request) => Ok(self.handle(request).await),
            Err(err) => {
                tracing::warn!(request_id = %request_id, error = %err, "rejected invocation envelope");
                Ok(TransformResponse::failure(request_id, err.to_string()))
            }
        }
    }

    async fn run(&self, request: TransformRequest) -> Result<Value, TransformError> {
        request.validate()?;

        let transform = Arc::clone(&self.transform);
        let task = tokio::spawn(
            async move { transform.transform(&request).await }.in_current_span(),
        );

        let fragment = match task.await {
            Ok(result) => result?,
            Err(join_err) if join_err.is_panic() => {
                return Err(TransformError::Panicked(panic_message(join_err.into_panic())));
            }
            Err(join_err) => return Err(TransformError::Logic(join_err.to_string())),
        };

        validate_fragment(&fragment)?;
        Ok(fragment)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
