// Composite summoner-context tools

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_number_with_default, json_schema_object, json_schema_string, parse_args,
    whole_number, Tool,
};
use lolbyte_core::{GameMode, RiotApi, DEFAULT_MATCH_LIMIT, MAX_MATCH_LIMIT};
use serde::Deserialize;

/// Tool returning account, ranked entries and recent match details in one call
pub struct SummonerContextTool {
    api: RiotApi,
    mode: GameMode,
}

impl SummonerContextTool {
    pub fn new(api: RiotApi, mode: GameMode) -> Self {
        Self { api, mode }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            GameMode::Lol => "fetch_summoner_context",
            GameMode::Tft => "fetch_tft_summoner_context",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummonerContextArgs {
    name: String,
    #[serde(default = "default_match_limit", deserialize_with = "whole_number")]
    match_limit: u32,
}

fn default_match_limit() -> u32 {
    DEFAULT_MATCH_LIMIT
}

#[async_trait::async_trait]
impl Tool for SummonerContextTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.mode {
            GameMode::Lol => "Fetch summoner info, league entries, and recent matches",
            GameMode::Tft => "Fetch TFT summoner info, league entries, and recent matches",
        };

        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("Summoner name in the format GameName#Tagline"),
                    "matchLimit": json_schema_number_with_default(
                        "Number of recent matches to fetch (default 5)",
                        DEFAULT_MATCH_LIMIT,
                        MAX_MATCH_LIMIT,
                    )
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: SummonerContextArgs = parse_args(self.name(), arguments)?;
        let context = self.api.build_context(self.mode, &args.name, args.match_limit).await?;
        Ok(CallToolResult::json(&context)?)
    }
}
