//! Tool trait for exposing operations to agent callers.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// An operation exposed to agent callers as a named tool.
///
/// The contract is the operation signature and its guarantees, not the
/// transport: hosts may surface tools over MCP, RPC, or as CLI subcommands.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Machine-readable tool name.
    fn name(&self) -> &str;

    /// Human-readable description shown to the calling agent.
    fn description(&self) -> &str;

    /// JSON schema of the accepted arguments, if the tool takes any.
    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    /// Execute the tool with the given JSON arguments.
    async fn execute(&self, args: Value) -> Result<Value>;
}
