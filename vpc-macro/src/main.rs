use lambda_runtime::{run, service_fn, Error};
use macro_handler::{init_logging, MacroHandler};

mod event_handler;
use event_handler::FixedVpc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let handler = MacroHandler::new(FixedVpc);

    run(service_fn(move |event| {
        let handler = handler.clone();
        async move { handler.handle_event(event).await }
    }))
    .await
}
