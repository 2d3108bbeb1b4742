//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{articles, views};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use viewtally_core::{ArticleDraft, ArticleService};

/// The main MCP server handler for viewtally.
#[derive(Clone)]
pub struct ArticleServer {
    service: ArticleService,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ArticleServer {
    /// Create a new server handler.
    pub fn new(service: ArticleService) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    #[tool(description = "Create an article. Titles are unique; content must be 60 to 300 characters.")]
    async fn article_create(&self, params: Parameters<ArticleDraft>) -> Result<CallToolResult, McpError> {
        articles::create_impl(&self.service, params.0).await
    }

    #[tool(description = "List all articles with their current view counts. Does not count as a view.")]
    async fn article_list(&self) -> Result<CallToolResult, McpError> {
        articles::list_impl(&self.service).await
    }

    /// Every fetch of an article is itself counted as a view.
    #[tool(description = "Get an article by id. Counts as a view; returns the post-increment view count.")]
    async fn article_get(&self, params: Parameters<articles::ArticleIdParams>) -> Result<CallToolResult, McpError> {
        articles::get_impl(&self.service, params.0).await
    }

    #[tool(description = "Replace an article's title and content. The view count is preserved.")]
    async fn article_update(
        &self, params: Parameters<articles::ArticleUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        articles::update_impl(&self.service, params.0).await
    }

    #[tool(description = "Delete an article and its view count.")]
    async fn article_delete(&self, params: Parameters<articles::ArticleIdParams>) -> Result<CallToolResult, McpError> {
        articles::delete_impl(&self.service, params.0).await
    }

    #[tool(description = "Get an article's view count without counting a view.")]
    async fn views_get(&self, params: Parameters<articles::ArticleIdParams>) -> Result<CallToolResult, McpError> {
        views::get_impl(&self.service, params.0).await
    }

    #[tool(description = "Reset an article's view count to zero.")]
    async fn views_reset(&self, params: Parameters<articles::ArticleIdParams>) -> Result<CallToolResult, McpError> {
        views::reset_impl(&self.service, params.0).await
    }

    #[tool(description = "Count one view of an article and return the new total.")]
    async fn views_increment(&self, params: Parameters<articles::ArticleIdParams>) -> Result<CallToolResult, McpError> {
        views::increment_impl(&self.service, params.0).await
    }
}

impl ServerHandler for ArticleServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "viewtally".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::service;

    #[tokio::test]
    async fn test_every_operation_is_routed() {
        let server = ArticleServer::new(service().await);
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            [
                "article_create",
                "article_delete",
                "article_get",
                "article_list",
                "article_update",
                "views_get",
                "views_increment",
                "views_reset",
            ]
        );
    }
}
