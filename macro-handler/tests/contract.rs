use lambda_runtime::{Context, LambdaEvent};
use macro_handler::{
    async_trait, transform_fn, MacroHandler, Status, Transform, TransformError, TransformRequest,
};
use serde_json::{json, Value};

struct EchoParams;

#[async_trait]
impl Transform for EchoParams {
    async fn transform(&self, request: &TransformRequest) -> Result<Value, TransformError> {
        tokio::task::yield_now().await;
        Ok(json!({ "Echo": request.params }))
    }
}

fn event(payload: Value) -> LambdaEvent<Value> {
    LambdaEvent::new(payload, Context::default())
}

#[tokio::test]
async fn request_id_is_echoed_on_success_and_failure() {
    let ok = MacroHandler::new(EchoParams);
    let failing = MacroHandler::new(transform_fn(|_| Err(TransformError::Logic("no".into()))));

    for id in ["a", "abc-123", "7f0c6c1e-0000-4000-8000-000000000000"] {
        let payload = json!({"requestId": id, "fragment": {}});

        let response = ok.handle_event(event(payload.clone())).await.unwrap();
        assert_eq!(response.request_id(), id);
        assert_eq!(response.status(), Status::Success);

        let response = failing.handle_event(event(payload)).await.unwrap();
        assert_eq!(response.request_id(), id);
        assert_eq!(response.status(), Status::Failure);
    }
}

#[tokio::test]
async fn status_and_payload_are_coupled_on_the_wire() {
    let handler = MacroHandler::new(EchoParams);

    let success = serde_json::to_value(
        handler
            .handle_event(event(json!({"requestId": "s", "params": {"A": 1}})))
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(success["status"], "SUCCESS");
    assert_eq!(success["fragment"], json!({"Echo": {"A": 1}}));
    assert!(success.get("errorMessage").is_none());

    let failure = serde_json::to_value(handler.handle_event(event(json!(42))).await.unwrap()).unwrap();
    assert_eq!(failure["status"], "FAILURE");
    assert!(!failure["errorMessage"].as_str().unwrap().is_empty());
    assert!(failure.get("fragment").is_none());
}

#[tokio::test]
async fn pure_transform_is_idempotent() {
    let handler = MacroHandler::new(EchoParams);
    let payload = json!({
        "requestId": "same",
        "fragment": {"Resources": {}},
        "params": {"Size": "large", "Count": 2}
    });

    let first = handler.handle_event(event(payload.clone())).await.unwrap();
    let second = handler.handle_event(event(payload)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn always_failing_transform_yields_failure() {
    let handler = MacroHandler::new(transform_fn(|request| {
        Err(TransformError::Logic(format!(
            "refusing to transform {}",
            request.transform_id
        )))
    }));

    let response = handler
        .handle_event(event(json!({
            "requestId": "abc-123",
            "transformId": "123456789012::Refuser",
            "fragment": {}
        })))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "requestId": "abc-123",
            "status": "FAILURE",
            "errorMessage": "refusing to transform 123456789012::Refuser"
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invocations_are_independent() {
    let handler = MacroHandler::new(EchoParams);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let handler = handler.clone();
            tokio::spawn(async move {
                let payload = json!({"requestId": format!("req-{i}"), "params": {"N": i}});
                handler.handle_event(event(payload)).await.unwrap()
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let response = task.await.unwrap();
        assert_eq!(response.request_id(), format!("req-{i}"));
        assert_eq!(response.fragment(), Some(&json!({"Echo": {"N": i}})));
    }
}
