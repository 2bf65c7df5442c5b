//! Provider-tagged intermediate records.
//!
//! Every provider adapter converts its raw payload into these shapes at the
//! client boundary, so the normalizers never have to guess which provider a
//! field came from.

use crate::models::League;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Sports-scoreboard API (scoreboard by date, summary by event)
    Espn,
    /// Generic sports-data API (games by date/league, game by id)
    ApiSports,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Espn => f.write_str("espn"),
            Provider::ApiSports => f.write_str("api-sports"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "espn" => Ok(Provider::Espn),
            "api-sports" | "apisports" | "api_sports" => Ok(Provider::ApiSports),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// One game/competition as reported by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub provider: Provider,
    pub id: Option<String>,
    /// League named by the payload itself, when it carries one
    pub league: Option<League>,
    pub kickoff: Option<DateTime<Utc>>,
    pub status: StatusRecord,
    pub home: Option<CompetitorRecord>,
    pub away: Option<CompetitorRecord>,
    /// Play-by-play drives, empty when the provider has none
    pub drives: Vec<DriveRecord>,
}

impl EventRecord {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            id: None,
            league: None,
            kickoff: None,
            status: StatusRecord::default(),
            home: None,
            away: None,
            drives: Vec::new(),
        }
    }

    pub fn has_id(&self, event_id: &str) -> bool {
        self.id.as_deref().map(str::trim) == Some(event_id.trim())
    }

    /// False only when the payload names a different league
    pub fn belongs_to(&self, league: League) -> bool {
        self.league.map_or(true, |own| own == league)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusRecord {
    /// Raw provider status code ("STATUS_FINAL", "NS", "Q2", ...)
    pub code: Option<String>,
    /// Human readable detail ("Final", "Sun, Sep 8th at 1:00 PM EDT")
    pub detail: Option<String>,
    /// Lifecycle state when the provider has one ("pre", "in", "post")
    pub state: Option<String>,
    /// Provider's own completion flag
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRecord {
    pub name: Option<String>,
    pub location: Option<String>,
    pub display_name: Option<String>,
    pub short_display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
}

/// Per-period scoring in whichever representation the provider uses
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodLine {
    /// Points scored within each period
    Deltas(Vec<Option<i64>>),
    /// Running totals through the end of each period
    Cumulative(Vec<Option<i64>>),
}

impl Default for PeriodLine {
    fn default() -> Self {
        PeriodLine::Deltas(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitorRecord {
    pub team: TeamRecord,
    pub periods: PeriodLine,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveRecord {
    pub end_period: Option<u32>,
    pub end_clock: Option<String>,
}
