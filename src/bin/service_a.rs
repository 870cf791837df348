//! Entry service: validates the CEP format and relays to service-b.

use clap::Parser;
use std::path::PathBuf;

use cep_weather::config::{load_config, EntryConfig};
use cep_weather::lifecycle::run_entry;

#[derive(Parser)]
#[command(name = "service-a")]
#[command(about = "Validates a CEP and relays it to the resolution service", long_about = None)]
struct Cli {
    /// Optional TOML file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config: EntryConfig = load_config(cli.config.as_deref())?;
    run_entry(config).await?;
    Ok(())
}
