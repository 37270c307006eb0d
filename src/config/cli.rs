use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Optional JSON file overriding the target site settings
    #[arg(long, global = true)]
    pub settings_file: Option<PathBuf>,

    /// Directory to store job records and results
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Write every fetched page into this directory for offline inspection
    #[arg(long, global = true)]
    pub debug_html_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scrape in the foreground and write the report to disk
    Scrape {
        /// Maximum number of games to process
        #[arg(long, default_value_t = 10)]
        max_items: usize,

        /// Listing offset to start from
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Seconds to wait between game pages
        #[arg(long, default_value_t = 2.0)]
        delay: f64,

        /// Stop the run after this many seconds
        #[arg(long)]
        time_budget: Option<u64>,

        /// Output file, defaults to results/game_iframes_<timestamp>.json
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Serve the job API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Wall-clock ceiling for each job, in seconds
        #[arg(long, default_value_t = 300)]
        time_budget: u64,
    },
}
