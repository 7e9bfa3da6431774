use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::json;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Operator CLI for the failover proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the live event stream of a running proxy
    Events {
        #[arg(short, long, default_value = "ws://localhost:8021/log")]
        url: String,
    },
    /// Run one health check against a target, the way the proxy does
    Probe {
        /// Target base URL (e.g. http://localhost:8022)
        target: String,

        #[arg(short, long, default_value = "/health/")]
        path: String,

        /// Timeout in seconds
        #[arg(short, long, default_value_t = 5)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Events { url } => follow_events(&url).await?,
        Commands::Probe {
            target,
            path,
            timeout,
        } => probe(&target, &path, Duration::from_secs(timeout)).await?,
    }

    Ok(())
}

async fn follow_events(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (mut stream, _) = connect_async(url).await?;
    eprintln!("Connected to {}", url);

    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(line) => println!("{}", line.as_str()),
            Message::Close(_) => break,
            _ => {}
        }
    }

    eprintln!("Event stream closed");
    Ok(())
}

async fn probe(target: &str, path: &str, timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!(
        "{}/{}",
        target.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let report = match client.get(&url).send().await {
        Ok(res) => {
            let status = res.status();
            json!({
                "url": url,
                "status": status.as_u16(),
                "healthy": status == reqwest::StatusCode::OK,
            })
        }
        Err(e) => json!({
            "url": url,
            "healthy": false,
            "error": e.to_string(),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report["healthy"] != json!(true) {
        std::process::exit(1);
    }
    Ok(())
}
