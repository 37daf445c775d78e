use clap::Parser;
use price_dataflow::{FetchConfig, Poller, PriceSeries};
use tokio::sync::watch;
use tracing::{error, info};
use validator::Validate;

#[derive(Parser)]
#[command(name = "price-dataflow")]
#[command(about = "Periodically fetch a JSON price array and print the prices")]
struct Cli {
    /// Configuration file (any format the `config` crate understands)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the polling interval in seconds
    #[arg(short, long)]
    interval: Option<u32>,

    /// Fetch once and exit
    #[arg(long)]
    once: bool,
}

fn print_series(series: &PriceSeries) {
    for record in &series.records {
        match &record.timestamp {
            Some(timestamp) => println!("{}\t{:.3}", timestamp, record.price),
            None => println!("{:.3}", record.price),
        }
    }
    if series.skipped > 0 {
        println!("({} elements skipped)", series.skipped);
    }
}

#[cfg(feature = "configs")]
fn load(cli: &Cli) -> Result<FetchConfig, Box<dyn std::error::Error>> {
    Ok(price_dataflow::configuration::load_config(cli.config.as_deref())?)
}

#[cfg(not(feature = "configs"))]
fn load(cli: &Cli) -> Result<FetchConfig, Box<dyn std::error::Error>> {
    if cli.config.is_some() {
        return Err("configuration files need the `configs` feature".into());
    }
    Ok(FetchConfig::default())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = load(&cli)?;
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    config.validate()?;

    info!(url = %config.url(), interval = config.poll_interval_secs, "starting price poller");
    let poller = Poller::new(config);

    if cli.once {
        let series = poller.poll_once().await?;
        print_series(&series);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        let _ = shutdown_tx.send(true);
    });

    poller.run(shutdown_rx, print_series).await;
    Ok(())
}
