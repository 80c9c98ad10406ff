//! SMHI → Meshtastic bridge — Binary Entrypoint
//! Parses the CLI, checks the radio is reachable, then runs the polling loop.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smhi_meshtastic::config::Config;
use smhi_meshtastic::feed::HttpAlertSource;
use smhi_meshtastic::runner::Runner;
use smhi_meshtastic::transport::MeshtasticTransport;

/// `--verbose` lowers the default filter to debug; RUST_LOG still wins when
/// set explicitly.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();

    let cfg = Config::parse().sanitized();
    init_tracing(cfg.verbose);

    let transport = MeshtasticTransport::from_config(&cfg);
    tracing::info!(
        "Starting smhi-meshtastic\n\
         Parameters:\n\
         \tverbose: {}\n\
         \tdry-run: {}\n\
         \texecutable: {}\n\
         \tconnection-type: {}\n\
         \tconnection-argument: {}\n\
         \tch-index: {}\n\
         \tapi-url: {}\n\
         \tapi-interval: {}\n\
         \tapi-geocode: {}\n\
         \tmax-messages: {}\n\
         \trepeat-number: {}\n\
         \trepeat-cycles: {}\n\
         \tConstructed command: {}",
        cfg.verbose,
        cfg.dry_run,
        cfg.executable.display(),
        cfg.connection_type.flag(),
        cfg.connection_argument,
        cfg.ch_index,
        cfg.api_url,
        cfg.api_interval,
        cfg.api_geocode,
        cfg.max_messages,
        cfg.repeat_number,
        cfg.repeat_cycles,
        transport.command_line(),
    );

    // A radio we cannot talk to at boot means every send would vanish.
    transport
        .health_check()
        .await
        .context("could not communicate with meshtastic device")?;

    let feed = HttpAlertSource::new(cfg.api_url.clone(), cfg.api_geocode);
    let runner = Runner::new(&cfg, Box::new(feed), Box::new(transport));
    runner.run().await
}
