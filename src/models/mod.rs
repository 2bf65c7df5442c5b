use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported competition tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    #[serde(rename = "NFL")]
    Nfl,
    #[serde(rename = "NCAAF")]
    Ncaaf,
}

impl League {
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Nfl => "NFL",
            League::Ncaaf => "NCAAF",
        }
    }

    /// Path segment used by the scoreboard provider
    pub fn espn_slug(&self) -> &'static str {
        match self {
            League::Nfl => "nfl",
            League::Ncaaf => "college-football",
        }
    }

    /// League id used by the sports-data provider
    pub fn api_sports_id(&self) -> u32 {
        match self {
            League::Nfl => 1,
            League::Ncaaf => 2,
        }
    }

    pub fn from_api_sports_id(id: i64) -> Option<League> {
        match id {
            1 => Some(League::Nfl),
            2 => Some(League::Ncaaf),
            _ => None,
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nfl" => Ok(League::Nfl),
            "ncaaf" | "cfb" | "college-football" => Ok(League::Ncaaf),
            _ => Err(format!("Unsupported league: {}", s.trim())),
        }
    }
}

/// Canonical schedule status every provider code maps into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalizedStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Final,
    Postponed,
}

impl NormalizedStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, NormalizedStatus::Final | NormalizedStatus::Postponed)
    }
}

/// Coarse lifecycle state reported with a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Pre,
    In,
    Post,
    Unknown,
}

impl GameState {
    pub fn from_state_str(state: &str) -> Self {
        match state.trim().to_ascii_lowercase().as_str() {
            "pre" => GameState::Pre,
            "in" => GameState::In,
            "post" => GameState::Post,
            _ => GameState::Unknown,
        }
    }
}

/// Which resolver tier produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreSource {
    PrimaryScoreboard,
    CrossLeagueScoreboard,
    SummaryFallback,
}

/// Schedule list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub date: DateTime<Utc>,
    pub league: League,
    pub home_team: String,
    pub away_team: String,
    pub home_logo: Option<String>,
    pub away_logo: Option<String>,
    pub status: NormalizedStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_full_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub name: String,
    pub location: Option<String>,
    pub display_name: String,
    pub short_display_name: Option<String>,
    pub abbreviation: String,
    pub logo: Option<String>,
}

/// Cumulative score at the end of one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub quarter: String,
    pub home: Option<i64>,
    pub away: Option<i64>,
    pub winner: Option<String>,
}

/// Single-game detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub id: String,
    pub date: Option<DateTime<Utc>>,
    pub league: League,
    pub source: ScoreSource,
    pub full_team1: String,
    pub full_team2: String,
    #[serde(rename = "team1_abbr")]
    pub team1_abbr: Option<String>,
    #[serde(rename = "team2_abbr")]
    pub team2_abbr: Option<String>,
    pub home_team: TeamInfo,
    pub away_team: TeamInfo,
    pub quarter_scores: Vec<PeriodScore>,
    pub completed_quarters: u32,
    pub completed: bool,
    pub game_state: GameState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_parsing() {
        assert_eq!("nfl".parse::<League>(), Ok(League::Nfl));
        assert_eq!("NCAAF".parse::<League>(), Ok(League::Ncaaf));
        assert_eq!(" college-football ".parse::<League>(), Ok(League::Ncaaf));
        assert_eq!("cfb".parse::<League>(), Ok(League::Ncaaf));
        assert!("mlb".parse::<League>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&NormalizedStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let json = serde_json::to_string(&ScoreSource::SummaryFallback).unwrap();
        assert_eq!(json, "\"summary-fallback\"");
        let json = serde_json::to_string(&GameState::Post).unwrap();
        assert_eq!(json, "\"post\"");
    }

    #[test]
    fn test_game_state_vocabulary() {
        assert_eq!(GameState::from_state_str("IN"), GameState::In);
        assert_eq!(GameState::from_state_str("halftime"), GameState::Unknown);
        assert_eq!(GameState::from_state_str(""), GameState::Unknown);
    }

    #[test]
    fn test_game_score_field_names() {
        let score = GameScore {
            id: "1".to_string(),
            date: None,
            league: League::Nfl,
            source: ScoreSource::PrimaryScoreboard,
            full_team1: "Away".to_string(),
            full_team2: "Home".to_string(),
            team1_abbr: Some("AWY".to_string()),
            team2_abbr: None,
            home_team: TeamInfo::default(),
            away_team: TeamInfo::default(),
            quarter_scores: Vec::new(),
            completed_quarters: 0,
            completed: false,
            game_state: GameState::Unknown,
        };
        let value = serde_json::to_value(&score).unwrap();
        assert_eq!(value["fullTeam1"], "Away");
        assert_eq!(value["team1_abbr"], "AWY");
        assert_eq!(value["source"], "primary-scoreboard");
        assert_eq!(value["gameState"], "unknown");
        assert_eq!(value["homeTeam"]["displayName"], "");
    }
}
