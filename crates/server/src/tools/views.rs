//! View-count tools: read, reset, explicit increment.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use viewtally_core::{ArticleId, ArticleService};

use super::articles::ArticleIdParams;
use super::{MessageOutput, json_result};

/// Output from the views_get and views_increment tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViewsOutput {
    pub id: ArticleId,
    pub view_count: u64,
    pub message: String,
}

/// Implementation of the views_get tool.
pub async fn get_impl(service: &ArticleService, params: ArticleIdParams) -> Result<CallToolResult, McpError> {
    let view_count = service.view_count(params.id).await?;
    json_result(&ViewsOutput { id: params.id, view_count, message: format!("Views: {view_count}") })
}

/// Implementation of the views_reset tool.
pub async fn reset_impl(service: &ArticleService, params: ArticleIdParams) -> Result<CallToolResult, McpError> {
    service.reset_views(params.id).await?;
    json_result(&MessageOutput::new("Article view count has been reset"))
}

/// Implementation of the views_increment tool.
pub async fn increment_impl(service: &ArticleService, params: ArticleIdParams) -> Result<CallToolResult, McpError> {
    let view_count = service.increment_views(params.id).await?;
    json_result(&ViewsOutput { id: params.id, view_count, message: "Article view count incremented".into() })
}
