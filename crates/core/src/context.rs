//! Composite lookups: identity, standings and recent match details for one
//! player in a single call.

use crate::api::{RiotApi, MAX_MATCH_LIMIT};
use crate::error::{LolError, LolResult};
use crate::types::{GameMode, MatchId, Puuid};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Aggregated player context. Built per call and never cached as a unit;
/// only the underlying fetches are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerContext {
    pub summoner: Value,
    pub league_entries: Value,
    /// Match details in the order the match-id list returned them.
    pub recent_matches: Vec<Value>,
}

impl RiotApi {
    /// League of Legends context for `GameName#TagLine`.
    pub async fn summoner_context(&self, name: &str, match_limit: u32) -> LolResult<SummonerContext> {
        self.build_context(GameMode::Lol, name, match_limit).await
    }

    /// Teamfight Tactics context for `GameName#TagLine`.
    pub async fn tft_summoner_context(
        &self,
        name: &str,
        match_limit: u32,
    ) -> LolResult<SummonerContext> {
        self.build_context(GameMode::Tft, name, match_limit).await
    }

    /// Resolve the player, fetch standings and match ids concurrently, then
    /// fan out one detail fetch per match id. The first failure at any stage
    /// aborts the whole context.
    pub async fn build_context(
        &self,
        mode: GameMode,
        name: &str,
        match_limit: u32,
    ) -> LolResult<SummonerContext> {
        if match_limit > MAX_MATCH_LIMIT {
            return Err(LolError::InvalidInput(format!(
                "matchLimit must be between 0 and {}, got {}",
                MAX_MATCH_LIMIT, match_limit
            )));
        }

        let summoner = self.resolve_identity(name).await?;
        let puuid = puuid_of(&summoner)?;

        let (league_entries, match_ids) = tokio::try_join!(
            self.league_entries_for(mode, &puuid),
            self.recent_match_ids_for(mode, &puuid, match_limit),
        )?;

        let match_ids: Vec<MatchId> = serde_json::from_value(match_ids).map_err(|e| {
            LolError::UnexpectedPayload(format!("match id list is not a list of strings: {}", e))
        })?;
        debug!(%mode, %puuid, matches = match_ids.len(), "Fetching match details");

        let recent_matches = self.match_details_fan_out(mode, match_ids).await?;
        info!(%mode, player = %name, matches = recent_matches.len(), "Built summoner context");

        Ok(SummonerContext {
            summoner,
            league_entries,
            recent_matches,
        })
    }

    /// One spawned task per id; results keep input order. On the first
    /// failure the remaining tasks are detached and their results dropped.
    async fn match_details_fan_out(
        &self,
        mode: GameMode,
        match_ids: Vec<MatchId>,
    ) -> LolResult<Vec<Value>> {
        let handles: Vec<_> = match_ids
            .into_iter()
            .map(|match_id| {
                let api = self.clone();
                tokio::spawn(async move { api.match_details_for(mode, &match_id).await })
            })
            .collect();

        try_join_all(handles.into_iter().map(|handle| async move {
            match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(LolError::from(join_error)),
            }
        }))
        .await
    }
}

fn puuid_of(account: &Value) -> LolResult<Puuid> {
    account
        .get("puuid")
        .and_then(Value::as_str)
        .filter(|puuid| !puuid.is_empty())
        .map(Puuid::new)
        .ok_or_else(|| LolError::UnexpectedPayload("account record has no puuid".to_string()))
}
