//! Tool facade exposing memory operations to agent callers.
//!
//! Each operation is a [`taskmem_core::Tool`] so hosts can attach them to
//! whatever caller interface they run — MCP, RPC, or CLI. The transport is
//! out of scope; the contract is the operation signature and its guarantees.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use taskmem_core::{CoreError, Tool};
use tracing::info;

use crate::reindex::ReindexJob;
use crate::service::{MemoryService, RecallResponse};

/// Pull the required `text` and optional `limit` out of tool arguments.
fn parse_query_args(args: &Value) -> taskmem_core::Result<(String, Option<usize>)> {
    let text = args
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CoreError::InvalidArguments("missing required 'text' parameter".into()))?;
    let limit = args.get("limit").and_then(|v| v.as_u64()).map(|v| v as usize);
    Ok((text.to_string(), limit))
}

/// JSON schema shared by the three query-shaped tools.
fn query_schema(text_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": { "type": "string", "description": text_description },
            "limit": {
                "type": "integer",
                "description": "Maximum number of matches to return. Uses the configured default if omitted."
            }
        },
        "required": ["text"]
    })
}

fn serialize_response(response: &RecallResponse) -> taskmem_core::Result<Value> {
    serde_json::to_value(response)
        .map_err(|e| CoreError::Tool(format!("failed to serialize matches: {e}")))
}

/// Dedup gate: find existing records covering the same work.
pub struct CheckPriorWorkTool {
    service: Arc<MemoryService>,
}

impl CheckPriorWorkTool {
    /// Create the tool over a shared service.
    pub fn new(service: Arc<MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CheckPriorWorkTool {
    fn name(&self) -> &str {
        "check_prior_work"
    }

    fn description(&self) -> &str {
        "Check for existing tasks covering the same work before creating a new one. \
         A match under the strict threshold means the existing task should be updated \
         or referenced instead."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(query_schema("Proposed task content to check for duplicates"))
    }

    async fn execute(&self, args: Value) -> taskmem_core::Result<Value> {
        let (text, limit) = parse_query_args(&args)?;
        info!(tool = self.name(), "memory tool called");
        let response = self
            .service
            .check_prior_work(&text, limit)
            .await
            .map_err(|e| CoreError::Tool(format!("prior-work check failed: {e}")))?;
        serialize_response(&response)
    }
}

/// Exploratory recall over all records.
pub struct RecallTool {
    service: Arc<MemoryService>,
}

impl RecallTool {
    /// Create the tool over a shared service.
    pub fn new(service: Arc<MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for RecallTool {
    fn name(&self) -> &str {
        "recall"
    }

    fn description(&self) -> &str {
        "Search all tasks semantically related to a query, regardless of status."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(query_schema("Free-text query to search related tasks"))
    }

    async fn execute(&self, args: Value) -> taskmem_core::Result<Value> {
        let (text, limit) = parse_query_args(&args)?;
        info!(tool = self.name(), "memory tool called");
        let response = self
            .service
            .recall(&text, limit)
            .await
            .map_err(|e| CoreError::Tool(format!("recall failed: {e}")))?;
        serialize_response(&response)
    }
}

/// Episodic memory: resolutions from terminal-resolved records.
pub struct EpisodicMemoryTool {
    service: Arc<MemoryService>,
}

impl EpisodicMemoryTool {
    /// Create the tool over a shared service.
    pub fn new(service: Arc<MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for EpisodicMemoryTool {
    fn name(&self) -> &str {
        "consult_episodic_memory"
    }

    fn description(&self) -> &str {
        "Retrieve how similar problems were resolved in completed or archived tasks."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(query_schema("Description of the problem being solved"))
    }

    async fn execute(&self, args: Value) -> taskmem_core::Result<Value> {
        let (text, limit) = parse_query_args(&args)?;
        info!(tool = self.name(), "memory tool called");
        let response = self
            .service
            .consult_episodic_memory(&text, limit)
            .await
            .map_err(|e| CoreError::Tool(format!("episodic memory failed: {e}")))?;
        serialize_response(&response)
    }
}

/// Full index rebuild from the record store.
pub struct ReindexTool {
    job: Arc<ReindexJob>,
    default_page_size: usize,
}

impl ReindexTool {
    /// Create the tool over a shared job with a default page size.
    pub fn new(job: Arc<ReindexJob>, default_page_size: usize) -> Self {
        Self { job, default_page_size }
    }
}

#[async_trait]
impl Tool for ReindexTool {
    fn name(&self) -> &str {
        "reindex_all"
    }

    fn description(&self) -> &str {
        "Rebuild the semantic index from every task in the store. Use after bulk \
         imports or when search results look stale."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "page_size": {
                    "type": "integer",
                    "description": "Records fetched per page. Uses the configured default if omitted."
                }
            }
        }))
    }

    async fn execute(&self, args: Value) -> taskmem_core::Result<Value> {
        let page_size = args
            .get("page_size")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(self.default_page_size);
        info!(tool = self.name(), page_size, "memory tool called");

        let summary = self
            .job
            .run(page_size)
            .await
            .map_err(|e| CoreError::Tool(format!("reindex failed: {e}")))?;
        serde_json::to_value(summary)
            .map_err(|e| CoreError::Tool(format!("failed to serialize summary: {e}")))
    }
}
