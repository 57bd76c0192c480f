// Ranked league entries

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, parse_args, Tool};
use lolbyte_core::{GameMode, Puuid, RiotApi};
use serde::Deserialize;

/// Tool to fetch ranked entries for a PUUID
pub struct LeagueEntriesTool {
    api: RiotApi,
    mode: GameMode,
}

impl LeagueEntriesTool {
    pub fn new(api: RiotApi, mode: GameMode) -> Self {
        Self { api, mode }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            GameMode::Lol => "get_league_entries",
            GameMode::Tft => "get_tft_league_entries",
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeagueEntriesArgs {
    puuid: String,
}

#[async_trait::async_trait]
impl Tool for LeagueEntriesTool {
    fn schema(&self) -> ToolSchema {
        let description = match self.mode {
            GameMode::Lol => "Fetch league entries by PUUID",
            GameMode::Tft => "Fetch TFT league entries by PUUID",
        };

        ToolSchema {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "puuid": json_schema_string("Player UUID")
                }),
                vec!["puuid"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: LeagueEntriesArgs = parse_args(self.name(), arguments)?;
        let entries = self
            .api
            .league_entries_for(self.mode, &Puuid::new(args.puuid))
            .await?;
        Ok(CallToolResult::json(&entries)?)
    }
}
