use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use macro_handler::TransformResponse;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Default)]
struct Stats {
    success_count: usize,
    failure_count: usize,
    echo_mismatch_count: usize,
    error_count: usize,
    total_latency_ms: f64,
}

#[derive(Parser, Debug)]
#[command(name = "invoke-test")]
#[command(about = "Invoke a CloudFormation macro function and check its replies")]
struct Args {
    /// Lambda function name
    function: String,

    /// Number of iterations to run
    #[arg(long, default_value = "100")]
    iters: usize,

    /// Number of parallel threads
    #[arg(long, default_value = "1", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    threads: usize,

    /// Template fragment to send, as JSON
    #[arg(long, default_value = "{}", value_parser = parse_json)]
    fragment: Value,

    /// Transform parameters to send, as a JSON object
    #[arg(long, default_value = "{}", value_parser = parse_json)]
    params: Value,
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

/// Everything an invocation needs besides the request id.
struct Template {
    function_name: String,
    account_id: String,
    region: String,
    fragment: Value,
    params: Value,
}

impl Template {
    fn envelope(&self, request_id: &str) -> Value {
        json!({
            "requestId": request_id,
            "accountId": self.account_id,
            "region": self.region,
            "transformId": format!("{}::{}", self.account_id, self.function_name),
            "fragment": self.fragment,
            "params": self.params,
            "templateParameterValues": {}
        })
    }
}

enum Outcome {
    Success,
    Failure(String),
    EchoMismatch(String),
}

fn classify(request_id: &str, payload: &[u8]) -> Result<Outcome, String> {
    let response: TransformResponse = serde_json::from_slice(payload)
        .map_err(|_| String::from_utf8_lossy(payload).to_string())?;

    if response.request_id() != request_id {
        return Ok(Outcome::EchoMismatch(response.request_id().to_string()));
    }

    if response.is_success() && response.fragment().is_none() {
        return Err("SUCCESS reply without a fragment".to_string());
    }

    Ok(match response.error_message() {
        None if response.is_success() => Outcome::Success,
        message => Outcome::Failure(message.unwrap_or("<no errorMessage>").to_string()),
    })
}

async fn run_invocations(
    client: Arc<Client>,
    template: Arc<Template>,
    thread_id: usize,
    start: usize,
    end: usize,
    total: usize,
    stats: Arc<Mutex<Stats>>,
) {
    for i in start..=end {
        let request_id = Uuid::new_v4().to_string();
        let payload = template.envelope(&request_id);

        let started = Instant::now();
        let result = client
            .invoke()
            .function_name(&template.function_name)
            .payload(aws_sdk_lambda::primitives::Blob::new(payload.to_string()))
            .send()
            .await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let outcome = match result {
            Ok(response) => match response.payload() {
                Some(body) => classify(&request_id, body.as_ref()),
                None => Err("No response".to_string()),
            },
            Err(e) => Err(e.to_string()),
        };

        // Update stats
        {
            let mut stats = stats.lock().await;
            match &outcome {
                Ok(Outcome::Success) => {
                    stats.success_count += 1;
                    stats.total_latency_ms += latency_ms;
                }
                Ok(Outcome::Failure(_)) => stats.failure_count += 1,
                Ok(Outcome::EchoMismatch(_)) => stats.echo_mismatch_count += 1,
                Err(_) => stats.error_count += 1,
            }
        }

        match outcome {
            Ok(Outcome::Success) => println!(
                "[Thread {}: {}/{}] {} => SUCCESS in {:.3}ms",
                thread_id, i, total, request_id, latency_ms
            ),
            Ok(Outcome::Failure(message)) => println!(
                "[Thread {}: {}/{}] {} => FAILURE: {}",
                thread_id, i, total, request_id, message
            ),
            Ok(Outcome::EchoMismatch(echoed)) => eprintln!(
                "[Thread {}: {}/{}] {} => requestId echoed as {:?}",
                thread_id, i, total, request_id, echoed
            ),
            Err(e) => eprintln!(
                "[Thread {}: {}/{}] Error invoking {}: {}",
                thread_id, i, total, request_id, e
            ),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!(
        "Running {} invocations across {} thread(s)",
        args.iters, args.threads
    );

    // Create AWS Lambda client
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = Arc::new(Client::new(&config));

    let template = Arc::new(Template {
        function_name: args.function.clone(),
        account_id: "123456789012".to_string(),
        region: config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "us-east-1".to_string()),
        fragment: args.fragment,
        params: args.params,
    });

    // Create shared stats
    let stats = Arc::new(Mutex::new(Stats::default()));

    // Calculate iterations per thread
    let iters_per_thread = args.iters / args.threads;
    let remainder = args.iters % args.threads;

    let mut tasks = JoinSet::new();

    let total_iters = args.iters;

    let mut start = 1;
    for t in 1..=args.threads {
        let end = if t == args.threads {
            start + iters_per_thread - 1 + remainder
        } else {
            start + iters_per_thread - 1
        };

        let client = Arc::clone(&client);
        let template = Arc::clone(&template);
        let stats = Arc::clone(&stats);

        tasks.spawn(async move {
            run_invocations(client, template, t, start, end, total_iters, stats).await;
        });

        start = end + 1;
    }

    // Wait for all tasks to complete
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            eprintln!("Task failed: {}", e);
        }
    }

    // Print summary
    let stats = stats.lock().await;
    println!("Completed {} invocations", args.iters);
    println!();
    println!("Results:");
    println!("  Success:         {}", stats.success_count);
    println!("  Failure:         {}", stats.failure_count);
    println!("  Echo mismatches: {}", stats.echo_mismatch_count);
    println!("  Errors:          {}", stats.error_count);
    if stats.success_count > 0 {
        let avg_latency = stats.total_latency_ms / stats.success_count as f64;
        println!("  Avg latency: {:.3}ms", avg_latency);
    }
}
