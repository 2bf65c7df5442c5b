pub mod api_sports_api;
pub mod espn_api;
pub mod lenient;
pub mod mock_feed;
pub mod records;

pub use records::*;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::models::League;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use api_sports_api::ApiSportsClient;
use espn_api::EspnClient;

/// One upstream provider, queried read-only.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// All events on one calendar day. Empty or absent data is an empty `Vec`.
    async fn scoreboard(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError>;

    /// The competition for one event id, or `UpstreamError::NotFound`.
    async fn summary(&self, event_id: &str, league: League) -> Result<EventRecord, UpstreamError>;
}

/// Build the client for `provider` from configuration.
pub fn build_client(provider: Provider, config: &Config) -> Arc<dyn UpstreamClient> {
    match provider {
        Provider::Espn => Arc::new(EspnClient::new(
            config.espn_base_url.clone(),
            config.upstream_timeout,
        )),
        Provider::ApiSports => Arc::new(ApiSportsClient::new(
            config.api_sports_base_url.clone(),
            config.api_sports_key.clone().unwrap_or_default(),
            config.upstream_timeout,
        )),
    }
}

/// Send `request` and decode the JSON body, mapping 404 to `NotFound`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, url))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamError::not_found(url));
    }
    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, url))
}

/// Parse the timestamp shapes providers send: RFC 3339, or minute precision
/// with or without a trailing `Z` (always read as UTC).
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw.trim_end_matches('Z');
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}
