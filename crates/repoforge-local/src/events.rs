//! Developer activity events, delivered to an optional webhook.
//!
//! The emitter is constructed by the caller and passed down explicitly;
//! there is no process-wide instance.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_XP: u32 = 10;

/// XP awarded per event type.
fn xp_value(event_type: &str) -> u32 {
    match event_type {
        "repo_created" => 50,
        "repo_initialized" => 30,
        "template_applied" => 20,
        "health_check_excellent" => 100,
        "health_check_good" => 50,
        "health_check_fair" => 25,
        "batch_operation_success" => 75,
        "security_policy_added" => 40,
        "ci_setup" => 60,
        "tests_added" => 50,
        _ => DEFAULT_XP,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeveloperEvent {
    pub event_type: String,
    pub developer: String,
    pub repository: String,
    pub timestamp: DateTime<Utc>,
    pub xp_value: u32,
    pub metadata: HashMap<String, String>,
}

/// Buffers developer activity events and forwards them to a webhook when one
/// is configured. Delivery failures are logged, never fatal.
pub struct EventEmitter {
    webhook_url: Option<String>,
    http: reqwest::Client,
    buffer: Vec<DeveloperEvent>,
}

impl EventEmitter {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
            buffer: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Record an event; returns whether it was delivered (always true when no
    /// webhook is configured).
    pub async fn emit(
        &mut self,
        event_type: &str,
        developer: &str,
        repository: &str,
        metadata: HashMap<String, String>,
    ) -> bool {
        let event = DeveloperEvent {
            event_type: event_type.to_string(),
            developer: developer.to_string(),
            repository: repository.to_string(),
            timestamp: Utc::now(),
            xp_value: xp_value(event_type),
            metadata,
        };
        self.buffer.push(event.clone());

        let Some(url) = self.webhook_url.as_ref() else {
            debug!(
                "event buffered (webhook disabled): {} for {} on {}",
                event_type, developer, repository
            );
            return true;
        };

        match self
            .http
            .post(url)
            .json(&event)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    "event delivered: {} ({} XP) for {}",
                    event.event_type, event.xp_value, event.developer
                );
                true
            }
            Ok(resp) => {
                warn!("event webhook rejected with status {}", resp.status());
                false
            }
            Err(e) => {
                error!("failed to send event webhook: {}", e);
                false
            }
        }
    }

    pub fn events(&self) -> &[DeveloperEvent] {
        &self.buffer
    }

    /// Total XP earned by a developer across buffered events.
    pub fn total_xp(&self, developer: &str) -> u32 {
        self.buffer
            .iter()
            .filter(|e| e.developer == developer)
            .map(|e| e.xp_value)
            .sum()
    }

    pub fn summary(&self) -> EventSummary {
        let mut developers: BTreeMap<String, DeveloperStats> = BTreeMap::new();
        let mut event_types: BTreeMap<String, TypeStats> = BTreeMap::new();
        let mut repos_per_dev: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for event in &self.buffer {
            let dev = developers.entry(event.developer.clone()).or_default();
            dev.events += 1;
            dev.xp += event.xp_value;
            repos_per_dev
                .entry(event.developer.clone())
                .or_default()
                .insert(event.repository.clone());

            let ty = event_types.entry(event.event_type.clone()).or_default();
            ty.count += 1;
            ty.total_xp += event.xp_value;
        }

        for (developer, repos) in repos_per_dev {
            if let Some(stats) = developers.get_mut(&developer) {
                stats.repositories = repos.len();
            }
        }

        EventSummary {
            total_events: self.buffer.len(),
            total_xp: self.buffer.iter().map(|e| e.xp_value).sum(),
            developers,
            event_types,
        }
    }

    /// Export all buffered events to a JSON file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.buffer)?;
        std::fs::write(path, json)?;
        info!("exported {} events to {:?}", self.buffer.len(), path);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeveloperStats {
    pub events: usize,
    pub xp: u32,
    pub repositories: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeStats {
    pub count: usize,
    pub total_xp: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub total_events: usize,
    pub total_xp: u32,
    pub developers: BTreeMap<String, DeveloperStats>,
    pub event_types: BTreeMap<String, TypeStats>,
}
