use crate::workflow::launch;
use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod i18n;
mod llm;
mod report;
mod research;
mod search;
mod utils;
mod workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config();

    launch(&config).await
}
