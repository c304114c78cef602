// Line-oriented console for building decks through a DeckSession.
use std::io::{stdout, Write};

use clap::Parser;
use deckflow_core::config::{parse_url, DeckflowConfig};
use deckflow_core::services::DeckSession;
use deckflow_tui::{commands::dispatch, render};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "deckflow")]
#[command(author, version, about = "deckflow - turn an event description into a slide deck")]
struct Args {
    /// Backend base URL (overrides DECKFLOW_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token for the backend (overrides DECKFLOW_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Seconds between job status queries
    #[arg(long)]
    poll_interval: Option<f64>,

    /// Seconds to wait for the liveness probe
    #[arg(long)]
    probe_timeout: Option<f64>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("deckflow=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

fn build_config(args: &Args) -> anyhow::Result<DeckflowConfig> {
    let mut config = DeckflowConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config.api_url = parse_url(url)?;
    }
    if let Some(token) = &args.token {
        config.api_token = Some(token.clone());
    }
    if let Some(secs) = args.poll_interval {
        config.poll_interval = positive_secs("--poll-interval", secs)?;
    }
    if let Some(secs) = args.probe_timeout {
        config.probe_timeout = positive_secs("--probe-timeout", secs)?;
    }
    Ok(config)
}

fn positive_secs(flag: &str, secs: f64) -> anyhow::Result<std::time::Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        anyhow::bail!("{} must be a positive number of seconds", flag);
    }
    std::time::Duration::try_from_secs_f64(secs)
        .map_err(|_| anyhow::anyhow!("{} is out of range", flag))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = build_config(&args)?;
    info!("deckflow starting. api_url={}", config.api_url);
    let (mut session, mut events) = DeckSession::connect(&config)?;

    for entry in session.entries() {
        println!("{}", render::entry(entry));
    }
    println!("\nType /help for available commands.\n");

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("deck> ");
        stdout().flush()?;

        tokio::select! {
            line = reader.next_line() => {
                let line = match line? {
                    Some(line) => line.trim().to_string(),
                    None => break, // EOF
                };
                if line.is_empty() {
                    continue;
                }
                let (quit_requested, output) = dispatch(&line, &mut session).await;
                if let Some(msg) = output {
                    println!("{}", msg);
                }
                if quit_requested {
                    break;
                }
            }
            Some(event) = events.recv() => {
                match session.apply_poll_event(event) {
                    Ok(id) => {
                        if let Some(entry) = session.entry(id) {
                            println!("\n{}", render::entry(entry));
                        }
                    }
                    Err(e) => error!("Dropped job update: {}", e),
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_seconds_are_range_checked() {
        assert_eq!(
            positive_secs("--poll-interval", 0.5).unwrap(),
            std::time::Duration::from_millis(500)
        );
        assert!(positive_secs("--poll-interval", 0.0).is_err());
        assert!(positive_secs("--poll-interval", 1e30).is_err());
    }
}
