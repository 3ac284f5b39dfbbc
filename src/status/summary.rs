// src/status/summary.rs
use crate::onionoo::RelayRecord;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MICROS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// ISO-8601 local time; the fraction is only written when it is non-zero.
fn isoformat(time: NaiveDateTime) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format(SECONDS_FORMAT).to_string()
    } else {
        time.format(MICROS_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkStatus {
    Online,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayCounts {
    pub relays: usize,
    pub guards: usize,
    pub exits: usize,
}

impl RelayCounts {
    pub fn tally(relays: &[RelayRecord]) -> Self {
        relays.iter().fold(
            Self {
                relays: relays.len(),
                ..Self::default()
            },
            |mut counts, relay| {
                if relay.is_guard() {
                    counts.guards += 1;
                }
                if relay.is_exit() {
                    counts.exits += 1;
                }
                counts
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub status: NetworkStatus,
    pub total_relays: usize,
    pub total_guards: usize,
    pub total_exits: usize,
    pub last_updated: String,
    pub source: String,
}

impl StatusSummary {
    /// Builds an online summary stamped with the local wall clock.
    pub fn online(counts: RelayCounts, source: impl Into<String>) -> Self {
        Self {
            status: NetworkStatus::Online,
            total_relays: counts.relays,
            total_guards: counts.guards,
            total_exits: counts.exits,
            last_updated: isoformat(Local::now().naive_local()),
            source: source.into(),
        }
    }
}
