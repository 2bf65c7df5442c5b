use super::lenient;
use super::records::{
    CompetitorRecord, DriveRecord, EventRecord, PeriodLine, Provider, StatusRecord, TeamRecord,
};
use super::{get_json, parse_kickoff, UpstreamClient};
use crate::error::UpstreamError;
use crate::models::League;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const ESPN_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/football";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct ScoreboardResponse {
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub events: Vec<EspnEvent>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnEvent {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: Option<EspnStatus>,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetition {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: Option<EspnStatus>,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub competitors: Vec<EspnCompetitor>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    pub status_type: EspnStatusType,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnStatusType {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>, // "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_FINAL"
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub state: Option<String>, // "pre" | "in" | "post"
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub short_detail: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnCompetitor {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub home_away: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub team: EspnTeam,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub linescores: Vec<EspnLineScore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnTeam {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub short_display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
    /// Summary payloads carry `logos[]` instead of `logo`
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub logos: Vec<EspnLogo>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnLogo {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub href: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EspnLineScore {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub display_value: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummaryResponse {
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub competitions: Vec<EspnCompetition>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub header: SummaryHeader,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub drives: SummaryDrives,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummaryHeader {
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummaryDrives {
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub previous: Vec<EspnDrive>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnDrive {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub end: EspnDriveEnd,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnDriveEnd {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub period: EspnPeriod,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub clock: EspnClock,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnPeriod {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub number: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EspnClock {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the sports-scoreboard API (scoreboard + summary endpoints).
#[derive(Debug, Clone)]
pub struct EspnClient {
    client: Client,
    base_url: String,
}

impl EspnClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn scoreboard_url(&self, date: NaiveDate, league: League) -> String {
        format!(
            "{}/{}/scoreboard?dates={}",
            self.base_url,
            league.espn_slug(),
            date.format("%Y%m%d")
        )
    }

    pub fn summary_url(&self, event_id: &str, league: League) -> String {
        format!(
            "{}/{}/summary?event={}",
            self.base_url,
            league.espn_slug(),
            event_id.trim()
        )
    }

    /// Fetch every event on `date` for `league`
    pub async fn fetch_scoreboard(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        let url = self.scoreboard_url(date, league);
        let response: ScoreboardResponse = match get_json(self.client.get(&url), &url).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!("No {} scoreboard for {} ({})", league, date, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if response.events.is_empty() {
            debug!("No {} events found for {}", league, date);
        }

        Ok(response
            .events
            .iter()
            .map(|event| EventRecord {
                league: Some(league),
                ..event_to_record(event)
            })
            .collect())
    }

    /// Fetch the summary for one event, including its drives
    pub async fn fetch_summary(
        &self,
        event_id: &str,
        league: League,
    ) -> Result<EventRecord, UpstreamError> {
        let url = self.summary_url(event_id, league);
        let response: SummaryResponse = get_json(self.client.get(&url), &url).await?;

        summary_to_record(&response, event_id)
            .map(|record| EventRecord {
                league: Some(league),
                ..record
            })
            .ok_or_else(|| UpstreamError::not_found(url))
    }
}

#[async_trait]
impl UpstreamClient for EspnClient {
    fn provider(&self) -> Provider {
        Provider::Espn
    }

    async fn scoreboard(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        self.fetch_scoreboard(date, league).await
    }

    async fn summary(&self, event_id: &str, league: League) -> Result<EventRecord, UpstreamError> {
        self.fetch_summary(event_id, league).await
    }
}

// ---------------------------------------------------------------------------
// Adapter: wire types -> provider-tagged records
// ---------------------------------------------------------------------------

pub fn event_to_record(event: &EspnEvent) -> EventRecord {
    let competition = event.competitions.first();
    let status = competition
        .and_then(|c| c.status.as_ref())
        .or(event.status.as_ref());
    let kickoff = competition
        .and_then(|c| c.date.as_deref())
        .or(event.date.as_deref())
        .and_then(parse_kickoff);

    let mut record = competition
        .map(competition_to_record)
        .unwrap_or_else(|| EventRecord::new(Provider::Espn));
    record.id = event.id.clone().or(record.id);
    record.kickoff = kickoff;
    record.status = status.map(status_to_record).unwrap_or_default();
    record
}

/// Find the competition matching `event_id` in `competitions[]`, then in
/// `header.competitions[]`, and attach the summary's drives.
pub fn summary_to_record(summary: &SummaryResponse, event_id: &str) -> Option<EventRecord> {
    let matches = |c: &&EspnCompetition| c.id.as_deref().map(str::trim) == Some(event_id.trim());
    let competition = summary
        .competitions
        .iter()
        .find(matches)
        .or_else(|| summary.header.competitions.iter().find(matches))?;

    let mut record = competition_to_record(competition);
    record.drives = summary
        .drives
        .previous
        .iter()
        .map(|d| DriveRecord {
            end_period: d
                .end
                .period
                .number
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0),
            end_clock: d.end.clock.display_value.clone(),
        })
        .collect();
    Some(record)
}

fn competition_to_record(competition: &EspnCompetition) -> EventRecord {
    let side = |side: &str| {
        competition
            .competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(side))
            .map(competitor_to_record)
    };

    EventRecord {
        provider: Provider::Espn,
        id: competition.id.clone(),
        league: None,
        kickoff: competition.date.as_deref().and_then(parse_kickoff),
        status: competition
            .status
            .as_ref()
            .map(status_to_record)
            .unwrap_or_default(),
        home: side("home"),
        away: side("away"),
        drives: Vec::new(),
    }
}

fn competitor_to_record(competitor: &EspnCompetitor) -> CompetitorRecord {
    let team = &competitor.team;
    CompetitorRecord {
        team: TeamRecord {
            name: team.name.clone(),
            location: team.location.clone(),
            display_name: team.display_name.clone(),
            short_display_name: team.short_display_name.clone(),
            abbreviation: team.abbreviation.clone(),
            logo: team
                .logo
                .clone()
                .or_else(|| team.logos.iter().find_map(|l| l.href.clone())),
        },
        // Linescores are points per period.
        periods: PeriodLine::Deltas(
            competitor
                .linescores
                .iter()
                .map(|s| s.display_value.or(s.value))
                .collect(),
        ),
    }
}

fn status_to_record(status: &EspnStatus) -> StatusRecord {
    let t = &status.status_type;
    StatusRecord {
        code: t.name.clone(),
        detail: t.short_detail.clone(),
        state: t.state.clone(),
        completed: t.completed,
    }
}
