// src/runner.rs
// The polling loop: drain rebroadcasts, fetch, diff, announce, rotate.

use anyhow::Result;
use std::collections::HashSet;
use tokio::time::{interval, Duration};

use crate::config::Config;
use crate::feed::{AlertKey, AlertRecord, AlertSource};
use crate::schedule::RebroadcastQueue;
use crate::segment::{segment, MAX_PAYLOAD_BYTES};
use crate::transport::Transport;

pub struct Runner {
    feed: Box<dyn AlertSource>,
    transport: Box<dyn Transport>,
    queue: RebroadcastQueue,
    known: HashSet<AlertKey>,
    max_messages: usize,
    poll_interval: Duration,
    // Bootstrap: alerts present in the very first fetch are assumed to have
    // been announced before we started. Dry-run suppresses nothing.
    first_cycle: bool,
}

impl Runner {
    pub fn new(cfg: &Config, feed: Box<dyn AlertSource>, transport: Box<dyn Transport>) -> Self {
        Self {
            feed,
            transport,
            queue: RebroadcastQueue::new(cfg.repeat_number, cfg.repeat_cycles),
            known: HashSet::new(),
            max_messages: cfg.max_messages,
            poll_interval: Duration::from_secs(cfg.api_interval),
            first_cycle: !cfg.dry_run,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut ticker = interval(self.poll_interval);
        loop {
            ticker.tick().await;
            self.run_cycle().await;
            tracing::debug!(secs = self.poll_interval.as_secs(), "sleeping until next poll");
        }
    }

    /// One polling cycle. Every failure inside is local: a bad fetch is an
    /// empty cycle, a failed send drops that one message, and the loop always
    /// reaches the state rotation at the end.
    pub async fn run_cycle(&mut self) {
        // Queued rebroadcasts from earlier cycles go out first.
        let due = self.queue.advance();
        if !due.is_empty() {
            tracing::debug!(sequences = due.len(), "sending queued rebroadcasts");
        }
        for sequence in due {
            self.dispatch_all(&sequence).await;
        }

        let records = match self.feed.fetch().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(source = self.feed.name(), "error fetching alerts: {e:#}");
                Vec::new()
            }
        };

        let current: HashSet<AlertKey> = records.iter().map(|r| r.key.clone()).collect();
        let new_keys: Vec<AlertKey> = current.difference(&self.known).cloned().collect();
        tracing::info!(
            "Got {} alerts in total of which {} were new.",
            current.len(),
            new_keys.len()
        );

        if !self.first_cycle {
            for key in &new_keys {
                let Some(record) = records.iter().find(|r| &r.key == key) else {
                    continue;
                };
                self.announce(record).await;
            }
        }

        // "Known" means "seen last cycle": wholesale replacement, so an alert
        // that disappears and later reappears under the same key is new again.
        self.known = current;
        self.first_cycle = false;
    }

    async fn announce(&mut self, record: &AlertRecord) {
        let message = record.render();
        let chunks = segment(&message, MAX_PAYLOAD_BYTES, self.max_messages);
        tracing::debug!(
            key = %record.key,
            parts = chunks.len(),
            "alert split into {} message(s), sending now",
            chunks.len()
        );
        self.dispatch_all(&chunks).await;
        if self.queue.is_enabled() {
            self.queue.schedule(&chunks);
        }
    }

    async fn dispatch_all(&self, chunks: &[String]) {
        for chunk in chunks {
            if let Err(e) = self.transport.dispatch(chunk).await {
                tracing::error!("error dispatching message: {e:#}");
            }
        }
    }
}
