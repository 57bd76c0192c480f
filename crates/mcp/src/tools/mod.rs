pub mod account;
pub mod context;
pub mod league;
pub mod matches;
mod registry;

pub use account::GetSummonerTool;
pub use context::SummonerContextTool;
pub use league::LeagueEntriesTool;
pub use matches::{MatchDetailsTool, RecentMatchesTool};
pub use registry::{
    json_schema_number_with_default, json_schema_object, json_schema_string, parse_args,
    whole_number, Tool, ToolRegistry,
};

use lolbyte_core::{GameMode, RiotApi};
use std::sync::Arc;

/// Registry holding every Riot tool, all sharing one `RiotApi` (and so one
/// cache and one rate limiter).
pub fn riot_tool_registry(api: RiotApi) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    for mode in [GameMode::Lol, GameMode::Tft] {
        registry.register(Arc::new(SummonerContextTool::new(api.clone(), mode)));
        registry.register(Arc::new(LeagueEntriesTool::new(api.clone(), mode)));
        registry.register(Arc::new(RecentMatchesTool::new(api.clone(), mode)));
        registry.register(Arc::new(MatchDetailsTool::new(api.clone(), mode)));
    }
    registry.register(Arc::new(GetSummonerTool::new(api)));

    registry
}
