use lambda_runtime::{run, service_fn, Error};
use macro_handler::{init_logging, MacroHandler};

mod config;
mod event_handler;
use config::SubnetDefaults;
use event_handler::SubnetTransform;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let defaults = SubnetDefaults::from_env()?;
    tracing::info!(cidr_block = %defaults.cidr_block, "loaded subnet defaults");

    let handler = MacroHandler::new(SubnetTransform::new(defaults));

    run(service_fn(move |event| {
        let handler = handler.clone();
        async move { handler.handle_event(event).await }
    }))
    .await
}
