use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod handlers;
mod middleware;
mod router;
mod schemas;

#[cfg(test)]
mod test_utils;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    model::init_tracing();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
