// Core Riot API access for lolbyte: cached, rate-limited fetches and the
// composite summoner-context lookups built on them.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod types;
pub mod upstream;

pub use api::{RiotApi, DEFAULT_MATCH_LIMIT, MAX_MATCH_LIMIT};
pub use cache::ResponseCache;
pub use config::LolbyteConfig;
pub use context::SummonerContext;
pub use error::{LolError, LolResult};
pub use pipeline::FetchPipeline;
pub use rate_limit::RateLimiter;
pub use types::*;
pub use upstream::{HttpUpstream, Upstream};
