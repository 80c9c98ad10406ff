// src/feed.rs
// SMHI warning feed: wire model, geocode filtering, and the fetch seam.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

/// Deduplication identity of one (alert, warning-area) pair, formed by
/// concatenating the two ids. Two occurrences with the same key are the same
/// logical alert and must not be announced as "new" twice in a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey(String);

impl AlertKey {
    pub fn new(alert_id: i64, area_id: i64) -> Self {
        Self(format!("{alert_id}{area_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlertKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One warning area reduced to what the broadcast needs. Rebuilt from the
/// feed every cycle; only the key outlives the cycle.
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub key: AlertKey,
    pub level: String,
    pub area: String,
    pub event: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl AlertRecord {
    /// Render the Swedish broadcast text, e.g.
    /// `SMHI: Gul varning för Skåne - Höga flöden från 2026-01-02 08:00 till ...`.
    pub fn render(&self) -> String {
        format!(
            "SMHI: {} varning för {} - {} från {} till {}",
            self.level,
            self.area,
            self.event,
            format_timestamp(self.start.as_deref()),
            format_timestamp(self.end.as_deref()),
        )
    }
}

/// RFC 3339 feed timestamp to local-readable `%Y-%m-%d %H:%M`; anything
/// unparseable is passed through verbatim rather than dropped.
fn format_timestamp(ts: Option<&str>) -> String {
    let Some(raw) = ts else {
        return "okänd tid".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

// --- wire model (only the fields we read; the rest is ignored) ---

#[derive(Debug, Deserialize)]
struct RawAlert {
    id: i64,
    #[serde(rename = "warningAreas", default)]
    warning_areas: Vec<RawWarningArea>,
}

#[derive(Debug, Deserialize)]
struct RawWarningArea {
    id: i64,
    #[serde(rename = "warningLevel")]
    warning_level: RawWarningLevel,
    #[serde(rename = "affectedAreas", default)]
    affected_areas: Vec<RawAffectedArea>,
    #[serde(rename = "areaName")]
    area_name: Option<RawLocalized>,
    #[serde(rename = "eventDescription")]
    event_description: Option<RawLocalized>,
    #[serde(rename = "approximateStart")]
    approximate_start: Option<String>,
    #[serde(rename = "approximateEnd")]
    approximate_end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWarningLevel {
    code: String,
    sv: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAffectedArea {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawLocalized {
    sv: Option<String>,
}

/// Reduce the raw feed to the warning areas that matter here: plain
/// informational MESSAGE entries are skipped, and only areas affecting
/// `geocode` are kept.
pub fn filter_alerts(feed: RawAlertFeed, geocode: i64) -> Vec<AlertRecord> {
    let mut out = Vec::new();
    for alert in feed.0 {
        for wa in alert.warning_areas {
            if wa.warning_level.code == "MESSAGE" {
                continue;
            }
            if !wa.affected_areas.iter().any(|a| a.id == geocode) {
                continue;
            }
            out.push(AlertRecord {
                key: AlertKey::new(alert.id, wa.id),
                level: wa.warning_level.sv.unwrap_or(wa.warning_level.code),
                area: wa
                    .area_name
                    .and_then(|n| n.sv)
                    .unwrap_or_else(|| "okänt område".to_string()),
                event: wa
                    .event_description
                    .and_then(|d| d.sv)
                    .unwrap_or_else(|| "varning".to_string()),
                start: wa.approximate_start,
                end: wa.approximate_end,
            });
        }
    }
    out
}

/// Opaque handle around the deserialized feed body so callers parse through
/// one place.
pub struct RawAlertFeed(Vec<RawAlert>);

impl RawAlertFeed {
    pub fn from_json(body: &str) -> Result<Self> {
        let alerts: Vec<RawAlert> =
            serde_json::from_str(body).context("parsing SMHI warning json")?;
        Ok(Self(alerts))
    }
}

/// The fetch seam the polling loop talks to.
#[async_trait]
pub trait AlertSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<AlertRecord>>;
    fn name(&self) -> &'static str;
}

/// Live HTTP source against the SMHI open-data warnings endpoint.
pub struct HttpAlertSource {
    url: String,
    geocode: i64,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpAlertSource {
    pub fn new(url: String, geocode: i64) -> Self {
        Self {
            url,
            geocode,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait]
impl AlertSource for HttpAlertSource {
    async fn fetch(&self) -> Result<Vec<AlertRecord>> {
        tracing::debug!(url = %self.url, "fetching warning feed");
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .context("fetching SMHI warnings")?
            .error_for_status()
            .context("SMHI warnings HTTP status")?;
        let body = resp.text().await.context("reading SMHI warnings body")?;
        let feed = RawAlertFeed::from_json(&body)?;
        Ok(filter_alerts(feed, self.geocode))
    }

    fn name(&self) -> &'static str {
        "smhi"
    }
}
