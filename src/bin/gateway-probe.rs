use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde_json::json;

use shortlink_gateway::health::readiness::wait_ready;

/// Readiness probe: poll the gateway until it answers or attempts run out.
#[derive(Parser)]
#[command(name = "gateway-probe")]
#[command(about = "Wait for the link shortener gateway to become ready", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Path to poll. `/api/stats/health` checks the stats service through the gateway.
    #[arg(short, long, default_value = "/health")]
    path: String,

    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    retries: u32,

    /// Pause between attempts.
    #[arg(short, long, default_value_t = 1000)]
    delay_ms: u64,

    /// Per-attempt request timeout.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Print a JSON summary instead of plain text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let target = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(cli.timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: could not build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let quiet = cli.json;
    let outcome = wait_ready(
        &client,
        &target,
        cli.retries,
        Duration::from_millis(cli.delay_ms),
        |attempt, limit, reason| {
            if !quiet {
                eprintln!("Waiting for gateway... attempt {}/{} ({})", attempt, limit, reason);
            }
        },
    )
    .await;

    if cli.json {
        let error = (!outcome.ready).then_some(&outcome.last_error);
        let summary = json!({
            "target": target,
            "ready": outcome.ready,
            "attempts": outcome.attempts,
            "error": error,
        });
        println!("{}", summary);
    } else if outcome.ready {
        println!("Gateway is ready ({} after {} attempt(s))", target, outcome.attempts);
    } else {
        eprintln!(
            "Gateway not ready after {} attempt(s): {}",
            outcome.attempts, outcome.last_error
        );
    }

    if outcome.ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
