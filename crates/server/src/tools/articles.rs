//! Article content tools: create, list, get, update, delete.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use viewtally_core::{Article, ArticleDraft, ArticleId, ArticleService};

use super::{MessageOutput, json_result};

/// Parameters for tools addressing a single article.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleIdParams {
    /// Article id returned by article_create.
    pub id: ArticleId,
}

/// Parameters for the article_update tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleUpdateParams {
    /// Article to update.
    pub id: ArticleId,
    /// New title (max 50 characters, unique).
    pub title: String,
    /// New content (60 to 300 characters).
    pub content: String,
}

/// Output from the article_create tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleCreateOutput {
    pub id: ArticleId,
    pub message: String,
}

/// Output from the article_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArticleListOutput {
    pub articles: Vec<Article>,
}

/// Implementation of the article_create tool.
pub async fn create_impl(service: &ArticleService, draft: ArticleDraft) -> Result<CallToolResult, McpError> {
    let id = service.create(draft).await?;
    json_result(&ArticleCreateOutput { id, message: format!("Article created with id: {id}") })
}

/// Implementation of the article_list tool.
pub async fn list_impl(service: &ArticleService) -> Result<CallToolResult, McpError> {
    let articles = service.list().await?;
    json_result(&ArticleListOutput { articles })
}

/// Implementation of the article_get tool. Counts as a view.
pub async fn get_impl(service: &ArticleService, params: ArticleIdParams) -> Result<CallToolResult, McpError> {
    let article = service.read(params.id).await?;
    json_result(&article)
}

/// Implementation of the article_update tool.
pub async fn update_impl(service: &ArticleService, params: ArticleUpdateParams) -> Result<CallToolResult, McpError> {
    service
        .update(params.id, ArticleDraft::new(params.title, params.content))
        .await?;
    json_result(&MessageOutput::new("Article updated"))
}

/// Implementation of the article_delete tool.
pub async fn delete_impl(service: &ArticleService, params: ArticleIdParams) -> Result<CallToolResult, McpError> {
    service.delete(params.id).await?;
    json_result(&MessageOutput::new("Article deleted"))
}
