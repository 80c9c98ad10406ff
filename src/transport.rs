// src/transport.rs
// Outbound seam: the meshtastic CLI wrapped behind a narrow trait.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use crate::config::Config;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one payload-sized message. Failure means this message is dropped;
    /// it must never take the rest of the cycle down with it.
    async fn dispatch(&self, message: &str) -> Result<()>;
}

/// Invokes the meshtastic executable with a fixed argument template, the
/// message appended as the final argument:
/// `meshtastic --host localhost --ch-index 0 --sendtext <message>`.
pub struct MeshtasticTransport {
    executable: PathBuf,
    template: Vec<String>,
    dry_run: bool,
}

impl MeshtasticTransport {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            executable: cfg.executable.clone(),
            template: vec![
                format!("--{}", cfg.connection_type.flag()),
                cfg.connection_argument.clone(),
                "--ch-index".to_string(),
                cfg.ch_index.clone(),
                "--sendtext".to_string(),
            ],
            dry_run: cfg.dry_run,
        }
    }

    /// Human-readable command line for the startup banner.
    pub fn command_line(&self) -> String {
        format!(
            "{} {} [message]",
            self.executable.display(),
            self.template.join(" ")
        )
    }

    /// Probe the radio with `--info` before entering the loop. A device that
    /// cannot be reached at boot means every later send would be dropped
    /// silently, so this failure is fatal. Skipped in dry-run.
    pub async fn health_check(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let output = Command::new(&self.executable)
            .arg("--info")
            .output()
            .await
            .with_context(|| format!("spawning {}", self.executable.display()))?;
        if !output.status.success() {
            bail!(
                "could not communicate with meshtastic device: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for MeshtasticTransport {
    async fn dispatch(&self, message: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!("DRY RUN: {message}");
            return Ok(());
        }

        let output = Command::new(&self.executable)
            .args(&self.template)
            .arg(message)
            .output()
            .await
            .with_context(|| format!("spawning {}", self.executable.display()))?;

        if !output.status.success() {
            bail!(
                "meshtastic exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            tracing::info!("{stdout}");
        }
        Ok(())
    }
}
