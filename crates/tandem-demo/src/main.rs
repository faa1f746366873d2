//! Selected-items demo binary.
//!
//! # Usage
//!
//! ```bash
//! # Replay the default scenario
//! RUST_LOG=debug tandem-demo
//!
//! # Pick two names in turn and three days
//! tandem-demo --pick James,Joel --days 3,9,14
//! ```

use clap::Parser;
use tandem_demo::Scenario;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Selected-items binding demo
#[derive(Parser, Debug)]
#[command(name = "tandem-demo")]
#[command(about = "Replays a selected-items binding scenario")]
#[command(version)]
struct Args {
    /// Selectable names
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Abraham,George,James,Joel,John,Peter,Samuel,Zachariah"
    )]
    names: Vec<String>,

    /// Names picked one after another
    #[arg(long, value_delimiter = ',', default_value = "James")]
    pick: Vec<String>,

    /// Days of the month picked at once
    #[arg(long, value_delimiter = ',', default_value = "1,15")]
    days: Vec<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("tandem demo starting");

    let scenario = Scenario { names: args.names, picks: args.pick, days: args.days };
    let report = scenario.run()?;

    tracing::info!(
        picked = report.picked.len(),
        declined = report.declined.len(),
        "scenario finished"
    );

    Ok(())
}
