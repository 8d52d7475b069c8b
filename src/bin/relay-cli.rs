use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Client for the NRDT relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "RELAY_URL")]
    url: String,

    /// Optional W3C traceparent to continue.
    #[arg(long)]
    traceparent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a message
    Send {
        message: String,
        /// Destination selector (e.g. go, node)
        #[arg(short, long)]
        stream: Option<String>,
        /// Send the message as a raw text body
        #[arg(long, conflicts_with = "stream")]
        raw: bool,
    },
    /// Fetch the form page
    Page,
    /// Check relay health
    Health,
    /// Submit a stream-trigger batch from a JSON file to the consumer endpoint
    Consume { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Send { message, stream, raw } => {
            let mut req = client.post(format!("{}/", base));
            if let Some(tp) = &cli.traceparent {
                req = req.header("traceparent", tp);
            }
            req = if raw {
                req.body(message)
            } else {
                req.json(&serde_json::json!({ "message": message, "stream": stream }))
            };
            print_response(req.send().await?).await?;
        }
        Commands::Page => {
            let res = client.get(format!("{}/", base)).send().await?;
            let status = res.status();
            let text = res.text().await?;
            if !status.is_success() {
                eprintln!("Error: relay returned status {}", status);
            }
            println!("{}", text);
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Consume { file } => {
            let batch: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let res = client.post(format!("{}/records", base)).json(&batch).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
