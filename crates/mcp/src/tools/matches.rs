// Match history and match detail tools

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_number_with_default, json_schema_object, json_schema_string, parse_args,
    whole_number, Tool,
};
use lolbyte_core::{GameMode, MatchId, Puuid, RiotApi, DEFAULT_MATCH_LIMIT, MAX_MATCH_LIMIT};
use serde::Deserialize;

/// Tool to list recent match ids for a PUUID
pub struct RecentMatchesTool {
    api: RiotApi,
    mode: GameMode,
}

impl RecentMatchesTool {
    pub fn new(api: RiotApi, mode: GameMode) -> Self {
        Self { api, mode }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            GameMode::Lol => "get_recent_matches",
            GameMode::Tft => "get_tft_recent_matches",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecentMatchesArgs {
    puuid: String,
    #[serde(default = "default_limit", deserialize_with = "whole_number")]
    limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_MATCH_LIMIT
}

#[async_trait::async_trait]
impl Tool for RecentMatchesTool {
    fn schema(&self) -> ToolSchema {
        let limit_description = match self.mode {
            GameMode::Lol => "Number of matches to fetch (default 5)",
            GameMode::Tft => "Number of TFT matches to fetch (default 5)",
        };

        ToolSchema {
            name: self.name().to_string(),
            description: "Fetch recent match IDs by PUUID".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "puuid": json_schema_string("Player UUID"),
                    "limit": json_schema_number_with_default(
                        limit_description,
                        DEFAULT_MATCH_LIMIT,
                        MAX_MATCH_LIMIT,
                    )
                }),
                vec!["puuid"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: RecentMatchesArgs = parse_args(self.name(), arguments)?;
        let ids = self
            .api
            .recent_match_ids_for(self.mode, &Puuid::new(args.puuid), args.limit)
            .await?;
        Ok(CallToolResult::json(&ids)?)
    }
}

/// Tool to fetch a full match record
pub struct MatchDetailsTool {
    api: RiotApi,
    mode: GameMode,
}

impl MatchDetailsTool {
    pub fn new(api: RiotApi, mode: GameMode) -> Self {
        Self { api, mode }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            GameMode::Lol => "get_match_details",
            GameMode::Tft => "get_tft_match_details",
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatchDetailsArgs {
    #[serde(rename = "matchId")]
    match_id: String,
}

#[async_trait::async_trait]
impl Tool for MatchDetailsTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.mode {
            GameMode::Lol => "Fetch match details by match ID",
            GameMode::Tft => "Fetch TFT match details by match ID",
        };

        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "matchId": json_schema_string("Match ID")
                }),
                vec!["matchId"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: MatchDetailsArgs = parse_args(self.name(), arguments)?;
        let details = self
            .api
            .match_details_for(self.mode, &MatchId::new(args.match_id))
            .await?;
        Ok(CallToolResult::json(&details)?)
    }
}
