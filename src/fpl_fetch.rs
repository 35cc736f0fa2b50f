use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::history::PeriodRecord;
use crate::http_cache::fetch_json;
use crate::http_client::http_client;
use crate::player_pool::RawPlayerRecord;

/// A player selected in a manager's squad for one gameweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SquadPick {
    #[serde(rename = "element")]
    pub player_id: u32,
}

/// Where an analysis gets its data. The live API implements this; tests use in-memory data.
pub trait FplSource {
    fn team_history(&self, team_id: u32) -> Result<Vec<PeriodRecord>, AnalysisError>;
    fn team_picks(&self, team_id: u32, period: u32) -> Result<Vec<SquadPick>, AnalysisError>;
    fn player_records(&self) -> Result<Vec<RawPlayerRecord>, AnalysisError>;
}

/// The public Fantasy Premier League API.
pub struct FplApi {
    client: &'static Client,
    base: String,
    use_cache: bool,
}

impl FplApi {
    pub fn new(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(config.http_timeout_secs)?,
            base: config.api_base.clone(),
            use_cache: config.http_cache,
        })
    }

    fn get(&self, resource: &str, path: &str) -> Result<String, AnalysisError> {
        let url = format!("{}{path}", self.base);
        debug!("GET {url}");
        fetch_json(self.client, &url, self.use_cache)
            .map_err(|err| AnalysisError::upstream(resource, format!("{err:#}")))
    }
}

impl FplSource for FplApi {
    fn team_history(&self, team_id: u32) -> Result<Vec<PeriodRecord>, AnalysisError> {
        let body = self.get("team history", &format!("/entry/{team_id}/history/"))?;
        parse_history_json(&body)
    }

    fn team_picks(&self, team_id: u32, period: u32) -> Result<Vec<SquadPick>, AnalysisError> {
        let body = self.get(
            &format!("picks for gameweek {period}"),
            &format!("/entry/{team_id}/event/{period}/picks/"),
        )?;
        parse_picks_json(&body)
    }

    fn player_records(&self) -> Result<Vec<RawPlayerRecord>, AnalysisError> {
        let body = self.get("player pool", "/bootstrap-static/")?;
        parse_bootstrap_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    current: Vec<PeriodRecord>,
}

#[derive(Debug, Deserialize)]
struct PicksResponse {
    #[serde(default)]
    picks: Vec<SquadPick>,
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    #[serde(default)]
    elements: Vec<RawPlayerRecord>,
}

pub fn parse_history_json(raw: &str) -> Result<Vec<PeriodRecord>, AnalysisError> {
    parse_envelope::<HistoryResponse>(raw, "team history")
        .map(|r| r.map(|r| r.current).unwrap_or_default())
}

pub fn parse_picks_json(raw: &str) -> Result<Vec<SquadPick>, AnalysisError> {
    parse_envelope::<PicksResponse>(raw, "squad picks")
        .map(|r| r.map(|r| r.picks).unwrap_or_default())
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Vec<RawPlayerRecord>, AnalysisError> {
    parse_envelope::<BootstrapResponse>(raw, "player pool")
        .map(|r| r.map(|r| r.elements).unwrap_or_default())
}

fn parse_envelope<T: DeserializeOwned>(
    raw: &str,
    resource: &str,
) -> Result<Option<T>, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|err| AnalysisError::upstream(resource, format!("unexpected response: {err}")))
}
