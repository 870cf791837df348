//! Resolution service: CEP → city → current temperature on three scales.

use clap::Parser;
use std::path::PathBuf;

use cep_weather::config::{load_config, ResolverConfig};
use cep_weather::lifecycle::run_resolver;

#[derive(Parser)]
#[command(name = "service-b")]
#[command(about = "Resolves a CEP to its city's current temperature", long_about = None)]
struct Cli {
    /// Optional TOML file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config: ResolverConfig = load_config(cli.config.as_deref())?;
    run_resolver(config).await?;
    Ok(())
}
