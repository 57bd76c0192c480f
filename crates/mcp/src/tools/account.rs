// Account lookup by Riot ID

use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, parse_args, Tool};
use lolbyte_core::RiotApi;
use serde::Deserialize;

/// Tool to resolve `GameName#TagLine` to an account record
pub struct GetSummonerTool {
    api: RiotApi,
}

impl GetSummonerTool {
    pub fn new(api: RiotApi) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetSummonerArgs {
    name: String,
}

#[async_trait::async_trait]
impl Tool for GetSummonerTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_summoner".to_string(),
            description: "Fetch summoner info by name".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("Summoner name in the format GameName#Tagline")
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: GetSummonerArgs = parse_args("get_summoner", arguments)?;
        let account = self.api.resolve_identity(&args.name).await?;
        Ok(CallToolResult::json(&account)?)
    }
}
