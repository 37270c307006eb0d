use gameframe::commands;
use gameframe::config::{cli::Command, Config};
use gameframe::domain::ScrapeParams;
use gameframe::error::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    let filter = EnvFilter::try_new(&config.args.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.ensure_directories()?;

    match &config.args.command {
        Command::Scrape {
            max_items,
            offset,
            delay,
            time_budget,
            output,
        } => {
            let params = ScrapeParams::new(*max_items, *offset, *delay);
            commands::run_scrape(&config, params, *time_budget, output.clone()).await?;
        }
        Command::Serve {
            host,
            port,
            time_budget,
        } => {
            commands::run_serve(&config, host, *port, *time_budget).await?;
        }
    }

    info!("Done");
    Ok(())
}
