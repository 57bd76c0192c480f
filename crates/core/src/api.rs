//! Riot API resources. Each operation builds one URL and hands it to the
//! fetch pipeline; payloads come back untouched.

use crate::config::LolbyteConfig;
use crate::error::{LolError, LolResult};
use crate::pipeline::FetchPipeline;
use crate::types::{GameMode, MatchId, Puuid, RiotId};
use serde_json::Value;
use url::Url;

/// Number of match ids requested when the caller gives no limit.
pub const DEFAULT_MATCH_LIMIT: u32 = 5;

/// Largest `count` the match-id endpoints accept.
pub const MAX_MATCH_LIMIT: u32 = 100;

/// Operation set over the account, league and match resources.
#[derive(Clone)]
pub struct RiotApi {
    pipeline: FetchPipeline,
    platform_base: Url,
    regional_base: Url,
}

impl RiotApi {
    pub fn new(pipeline: FetchPipeline, config: &LolbyteConfig) -> LolResult<Self> {
        Ok(Self::with_base_urls(
            pipeline,
            config.platform_base_url()?,
            config.regional_base_url()?,
        ))
    }

    pub fn with_base_urls(pipeline: FetchPipeline, platform_base: Url, regional_base: Url) -> Self {
        Self {
            pipeline,
            platform_base,
            regional_base,
        }
    }

    pub fn pipeline(&self) -> &FetchPipeline {
        &self.pipeline
    }

    /// Resolve `GameName#TagLine` to its account record (carries `puuid`).
    pub async fn resolve_identity(&self, name: &str) -> LolResult<Value> {
        let riot_id: RiotId = name.parse()?;
        self.account_by_riot_id(&riot_id).await
    }

    pub async fn account_by_riot_id(&self, riot_id: &RiotId) -> LolResult<Value> {
        let url = build_url(
            &self.regional_base,
            &[
                "riot",
                "account",
                "v1",
                "accounts",
                "by-riot-id",
                riot_id.game_name.as_str(),
                riot_id.tag_line.as_str(),
            ],
            &[],
        )?;
        self.pipeline.fetch(url.as_str()).await
    }

    pub async fn league_entries(&self, puuid: &Puuid) -> LolResult<Value> {
        self.league_entries_for(GameMode::Lol, puuid).await
    }

    pub async fn tft_league_entries(&self, puuid: &Puuid) -> LolResult<Value> {
        self.league_entries_for(GameMode::Tft, puuid).await
    }

    pub async fn recent_match_ids(&self, puuid: &Puuid, limit: u32) -> LolResult<Value> {
        self.recent_match_ids_for(GameMode::Lol, puuid, limit).await
    }

    pub async fn tft_recent_match_ids(&self, puuid: &Puuid, limit: u32) -> LolResult<Value> {
        self.recent_match_ids_for(GameMode::Tft, puuid, limit).await
    }

    pub async fn match_details(&self, match_id: &MatchId) -> LolResult<Value> {
        self.match_details_for(GameMode::Lol, match_id).await
    }

    pub async fn tft_match_details(&self, match_id: &MatchId) -> LolResult<Value> {
        self.match_details_for(GameMode::Tft, match_id).await
    }

    /// Ranked entries; league resources live on the platform host.
    pub async fn league_entries_for(&self, mode: GameMode, puuid: &Puuid) -> LolResult<Value> {
        require_non_empty("puuid", puuid.as_str())?;
        let segments: &[&str] = match mode {
            GameMode::Lol => &["lol", "league", "v4", "entries", "by-puuid"],
            GameMode::Tft => &["tft", "league", "v1", "by-puuid"],
        };

        let mut url = build_url(&self.platform_base, segments, &[])?;
        push_segment(&mut url, puuid.as_str())?;
        self.pipeline.fetch(url.as_str()).await
    }

    /// Most recent match ids, newest first, at most `limit` of them.
    pub async fn recent_match_ids_for(
        &self,
        mode: GameMode,
        puuid: &Puuid,
        limit: u32,
    ) -> LolResult<Value> {
        require_non_empty("puuid", puuid.as_str())?;
        if limit > MAX_MATCH_LIMIT {
            return Err(LolError::InvalidInput(format!(
                "limit must be between 0 and {}, got {}",
                MAX_MATCH_LIMIT, limit
            )));
        }

        let count = limit.to_string();
        let url = build_url(
            &self.regional_base,
            &[
                match_product(mode),
                "match",
                match_version(mode),
                "matches",
                "by-puuid",
                puuid.as_str(),
                "ids",
            ],
            &[("start", "0"), ("count", count.as_str())],
        )?;
        self.pipeline.fetch(url.as_str()).await
    }

    pub async fn match_details_for(&self, mode: GameMode, match_id: &MatchId) -> LolResult<Value> {
        require_non_empty("matchId", match_id.as_str())?;
        let url = build_url(
            &self.regional_base,
            &[
                match_product(mode),
                "match",
                match_version(mode),
                "matches",
                match_id.as_str(),
            ],
            &[],
        )?;
        self.pipeline.fetch(url.as_str()).await
    }
}

fn match_product(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Lol => "lol",
        GameMode::Tft => "tft",
    }
}

fn match_version(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Lol => "v5",
        GameMode::Tft => "v1",
    }
}

fn require_non_empty(field: &str, value: &str) -> LolResult<()> {
    if value.trim().is_empty() {
        return Err(LolError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Append percent-encoded path segments and query pairs to `base`.
fn build_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> LolResult<Url> {
    let mut url = base.clone();
    for segment in segments {
        push_segment(&mut url, segment)?;
    }
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

fn push_segment(url: &mut Url, segment: &str) -> LolResult<()> {
    url.path_segments_mut()
        .map_err(|_| LolError::Config("Base URL cannot have path segments".to_string()))?
        .pop_if_empty()
        .push(segment);
    Ok(())
}
