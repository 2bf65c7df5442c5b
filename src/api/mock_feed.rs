use super::api_sports_api::{game_to_record, ApiSportsGame, GamesResponse};
use super::records::{EventRecord, Provider};
use super::UpstreamClient;
use crate::error::UpstreamError;
use crate::models::League;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::warn;

/// File-backed provider used in mock mode.
///
/// The file holds a sports-data API response (either the full envelope or a
/// bare array of games). Every day of a query window sees the same games.
#[derive(Debug, Clone)]
pub struct MockFeed {
    path: PathBuf,
}

impl MockFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<EventRecord>, UpstreamError> {
        let path = self.path.display().to_string();
        let data = std::fs::read_to_string(&self.path).map_err(|e| UpstreamError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let games: Vec<ApiSportsGame> = match serde_json::from_str::<GamesResponse>(&data) {
            Ok(envelope) => envelope.response,
            Err(_) => serde_json::from_str(&data).map_err(|e| UpstreamError::Parse {
                url: path,
                message: e.to_string(),
            })?,
        };

        Ok(games.iter().map(game_to_record).collect())
    }
}

#[async_trait]
impl UpstreamClient for MockFeed {
    fn provider(&self) -> Provider {
        Provider::ApiSports
    }

    async fn scoreboard(
        &self,
        _date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        warn!("MOCK_MODE active, serving mock schedule for {}", league);
        Ok(self
            .load()?
            .into_iter()
            .filter(|record| record.belongs_to(league))
            .collect())
    }

    async fn summary(&self, event_id: &str, league: League) -> Result<EventRecord, UpstreamError> {
        self.load()?
            .into_iter()
            .find(|record| record.has_id(event_id) && record.belongs_to(league))
            .ok_or_else(|| UpstreamError::not_found(self.path.display().to_string()))
    }
}
