//! MCP tool implementations.
//!
//! One tool per article operation. Every tool answers with a single
//! pretty-printed JSON text block.

pub mod articles;
pub mod views;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Confirmation returned by write operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageOutput {
    pub message: String,
}

impl MessageOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use rmcp::model::CallToolResult;
    use serde::de::DeserializeOwned;
    use viewtally_core::{AppConfig, ArticleDb, ArticleService};

    pub const CONTENT: &str = "Pattern matching on enums keeps every state transition explicit and checked.";

    pub async fn service() -> ArticleService {
        let db = ArticleDb::open_in_memory().await.unwrap();
        ArticleService::from_config(Arc::new(db), &AppConfig::default())
    }

    pub fn parse<T: DeserializeOwned>(result: &CallToolResult) -> T {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}
