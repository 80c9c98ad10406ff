// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod feed;
pub mod runner;
pub mod schedule;
pub mod segment;
pub mod transport;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::feed::{AlertKey, AlertRecord, AlertSource, HttpAlertSource};
pub use crate::runner::Runner;
pub use crate::schedule::RebroadcastQueue;
pub use crate::segment::{segment, MAX_PAYLOAD_BYTES};
pub use crate::transport::{MeshtasticTransport, Transport};
