mod config;
mod error;
mod github;
mod models;
mod pipeline;
mod storage;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::github::{TrafficClient, ViewSource};
use crate::pipeline::SyncPipeline;
use crate::storage::{KintoneClient, RecordStore};

#[derive(Parser)]
#[command(name = "traffic-sync", about = "GitHub traffic → kintone sync", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Sync new daily view records into kintone (cron entry point)
    Sync,

    /// Show the most recent date already stored for the project
    Latest,

    /// Fetch and print the upstream view series without writing anything
    Views,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "traffic_sync=info,warn",
        1 => "traffic_sync=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let project = config.project();

    match cli.command {
        Command::Sync => {
            let _t = utils::Timer::start("Traffic sync");
            let store = Arc::new(KintoneClient::new(&config.kintone)?);
            let source = Arc::new(TrafficClient::new(&config.github)?);
            let pipeline =
                SyncPipeline::new(store, source, config.github.owner, config.github.repo);

            let outcome = pipeline.run().await?;
            info!("Done: {} records created", outcome.created());
            println!("[COMPLETE] {}", outcome.message());
        }

        Command::Latest => {
            let store = KintoneClient::new(&config.kintone)?;
            match store.read_latest(&project).await? {
                Some(date) => println!("{}: latest stored date {}", project, date),
                None => println!("{}: no records stored yet", project),
            }
        }

        Command::Views => {
            let source = TrafficClient::new(&config.github)?;
            let views = source
                .fetch_views(&config.github.owner, &config.github.repo)
                .await?;
            if views.is_empty() {
                println!("{}: no traffic data in the upstream window", project);
            } else {
                println!("{} — {} days:", project, views.len());
                for v in &views {
                    println!(
                        "  {}  count {:>6}  uniques {:>6}",
                        utils::day_of(v.timestamp),
                        v.count,
                        v.uniques
                    );
                }
            }
        }
    }

    Ok(())
}
