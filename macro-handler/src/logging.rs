use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the Lambda log subscriber.
///
/// Level and format come from `AWS_LAMBDA_LOG_LEVEL` / `AWS_LAMBDA_LOG_FORMAT`
/// (falling back to `RUST_LOG`). Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(lambda_runtime::tracing::init_default_subscriber);
}
