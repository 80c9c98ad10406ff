// src/config.rs
// CLI surface and the immutable runtime configuration built from it.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str =
    "https://opendata-download-warnings.smhi.se/ibww/api/version/1/warning.json";

/// How the meshtastic CLI reaches the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectionType {
    Host,
    Port,
    Ble,
}

impl ConnectionType {
    /// The meshtastic CLI flag name, without the leading dashes.
    pub fn flag(self) -> &'static str {
        match self {
            ConnectionType::Host => "host",
            ConnectionType::Port => "port",
            ConnectionType::Ble => "ble",
        }
    }
}

/// Fetches Swedish weather warnings from SMHI and broadcasts them to your
/// local Meshtastic network.
#[derive(Debug, Clone, Parser)]
#[command(name = "smhi-meshtastic", version, about)]
pub struct Config {
    /// Path to the meshtastic executable
    pub executable: PathBuf,

    /// Increase output verbosity
    #[arg(long)]
    pub verbose: bool,

    /// Suspend calls to the meshtastic executable
    #[arg(long)]
    pub dry_run: bool,

    /// Connection type
    #[arg(long, value_enum, default_value_t = ConnectionType::Host)]
    pub connection_type: ConnectionType,

    /// Connection argument (hostname, serial port or BLE address)
    #[arg(long, default_value = "localhost")]
    pub connection_argument: String,

    /// Meshtastic channel to which messages will be sent
    #[arg(long, default_value = "0")]
    pub ch_index: String,

    /// Warning feed to poll
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Seconds between feed polls
    #[arg(long, default_value_t = 120)]
    pub api_interval: u64,

    /// SMHI geocode of the area to watch
    #[arg(long, default_value_t = 1)]
    pub api_geocode: i64,

    /// Maximum number of messages per alert; longer alerts are truncated
    #[arg(long, default_value_t = 2)]
    pub max_messages: usize,

    /// Number of re-broadcasts to perform per alert (0 disables)
    #[arg(long, default_value_t = 0)]
    pub repeat_number: usize,

    /// Number of poll intervals between re-broadcasts
    #[arg(long, default_value_t = 2)]
    pub repeat_cycles: usize,
}

impl Config {
    /// Clamp values the rest of the code assumes to be sane. A zero message
    /// cap would make the segmenter's reserve arithmetic meaningless, and a
    /// zero interval would panic the ticker.
    pub fn sanitized(mut self) -> Self {
        self.max_messages = self.max_messages.max(1);
        self.api_interval = self.api_interval.max(1);
        self
    }
}
