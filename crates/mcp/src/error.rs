//! Failures raised by tool execution and their JSON-RPC form.

use crate::protocol::JsonRpcError;
use lolbyte_core::LolError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments missing or of the wrong shape.
    #[error("{0}")]
    InvalidParams(String),

    /// Failure from the Riot API layer.
    #[error(transparent)]
    Riot(#[from] LolError),

    /// The result could not be serialized.
    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Normalize into one of the three failure signals a tool call can
    /// produce: invalid params, or internal error carrying the upstream
    /// status when there is one.
    pub fn into_rpc_error(self, tool: &str) -> JsonRpcError {
        match self {
            Self::InvalidParams(message) => JsonRpcError::invalid_params(message),
            Self::Riot(LolError::InvalidInput(message)) => JsonRpcError::invalid_params(message),
            Self::Riot(err @ LolError::Upstream { .. }) => {
                let status = err.status();
                let rpc = JsonRpcError::internal_error(format!("Error executing tool {}: {}", tool, err));
                match status {
                    Some(status) => rpc.with_data(json!({ "status": status })),
                    None => rpc,
                }
            }
            Self::Riot(err) => {
                JsonRpcError::internal_error(format!("Error executing tool {}: {}", tool, err))
            }
            Self::Serialization(_) => {
                JsonRpcError::internal_error(format!("Error executing tool {}: internal error", tool))
            }
        }
    }
}
