use anyhow::Result;
use clap::Parser;

mod agent;
mod analysis;
mod cache;
mod cli;
mod config;
mod i18n;
mod llm;
mod memory;
mod search;
mod server;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let query = args.query.clone();
    let config = args.into_config()?;
    config.validate()?;

    match query {
        Some(query) => agent::run_query(&config, &query).await,
        None => server::serve(&config).await,
    }
}
