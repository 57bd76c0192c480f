// MCP (Model Context Protocol) server exposing Riot Games lookups as tools
// to agent clients.

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::ToolError;
pub use server::McpServer;
pub use tools::{riot_tool_registry, Tool, ToolRegistry};
