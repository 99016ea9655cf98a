use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use health_gateway::health::{ProbeResult, ProbeTarget, ServiceHealthProbe, DEFAULT_HEALTH_PATH};

#[derive(Parser)]
#[command(name = "probe-cli")]
#[command(about = "Probe services directly or through the health gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a service once, without the gateway
    Check {
        #[arg(long)]
        host: String,
        #[arg(short, long)]
        port: u16,
        #[arg(long, default_value = DEFAULT_HEALTH_PATH)]
        path: String,
        #[arg(short, long, default_value_t = 3000)]
        timeout_ms: u64,
        /// Name used in log output
        #[arg(short, long, default_value = "cli")]
        service: String,
    },
    /// Ask the gateway for every service's health
    Services {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Ask the gateway for one service's health
    Service {
        name: String,
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

/// Exit code for a probe outcome: 0 healthy, 1 unhealthy, 2 unreachable.
fn exit_code(result: &ProbeResult) -> u8 {
    match result {
        ProbeResult::Healthy { .. } => 0,
        ProbeResult::Unhealthy { .. } => 1,
        ProbeResult::Unreachable => 2,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Check { host, port, path, timeout_ms, service } => {
            let target = ProbeTarget::new(host, port)?.with_path(&path)?;
            let result = ServiceHealthProbe::new(service)
                .with_timeout(Duration::from_millis(timeout_ms))
                .probe(&target)
                .await;

            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "target": target.to_string(),
                "result": result,
            }))?);
            Ok(ExitCode::from(exit_code(&result)))
        }
        Commands::Services { url } => {
            let res = client.get(format!("{}/health/services", url)).send().await?;
            print_response(res).await
        }
        Commands::Service { name, url } => {
            let res = client.get(format!("{}/health/services/{}", url, name)).send().await?;
            print_response(res).await
        }
    }
}

/// Print the gateway's JSON body. Non-2xx statuses map to exit code 1.
async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if status.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Gateway returned status {}", status);
        Ok(ExitCode::from(1))
    }
}
