use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Command-line client for the stock bridge service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Fetch the quote report for a ticker
    Quote { ticker: String },
    /// Fetch the filings report for a ticker
    Filings { ticker: String },
    /// Fetch chart series for a ticker
    Chart {
        ticker: String,
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        period: Option<String>,
    },
    /// Fetch recent news for a ticker
    News {
        ticker: String,
        #[arg(long)]
        company: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Quote { ticker } => {
            client
                .post(format!("{}/quote", base))
                .json(&json!({ "ticker": ticker }))
                .send()
                .await?
        }
        Commands::Filings { ticker } => {
            client
                .post(format!("{}/filings", base))
                .json(&json!({ "ticker": ticker }))
                .send()
                .await?
        }
        Commands::Chart {
            ticker,
            interval,
            period,
        } => {
            client
                .post(format!("{}/chart", base))
                .json(&json!({ "ticker": ticker, "interval": interval, "period": period }))
                .send()
                .await?
        }
        Commands::News { ticker, company } => {
            client
                .post(format!("{}/news", base))
                .json(&json!({ "ticker": ticker, "companyName": company }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }

    // Pass-through routes carry plain text reports; print those as-is.
    match json.get("data").and_then(Value::as_str) {
        Some(report) if status.is_success() => print!("{}", report),
        _ => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}
