//! MCP server handler implementation.
//!
//! Routes `tools/list` and `tools/call` through the [`ToolRegistry`] and the
//! render pipeline. Internal errors become protocol errors only here.

use std::sync::Arc;

use quickchart_core::Error;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult, PaginatedRequestParam,
        ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};

use crate::pipeline::{self, ToolContext};
use crate::registry::{Prepared, ToolRegistry};

/// The main MCP server handler for mcp-quickchart.
#[derive(Clone)]
pub struct QuickChartServer {
    registry: Arc<ToolRegistry>,
    ctx: Arc<ToolContext>,
}

impl QuickChartServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry: Arc::new(registry), ctx: Arc::new(ctx) }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.registry.list()
    }

    /// Run one tool call end to end.
    pub async fn call(&self, name: &str, args: Option<JsonObject>) -> Result<CallToolResult, Error> {
        let tool = self.registry.find(name)?;
        match tool.prepare(args, &self.ctx.endpoints)? {
            Prepared::Immediate(result) => Ok(result),
            Prepared::Render(plan) => pipeline::execute(*plan, &self.ctx).await,
        }
    }
}

impl ServerHandler for QuickChartServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-quickchart".into(),
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
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { meta: None, tools: self.tools(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tool call");
        self.call(&request.name, request.arguments).await.map_err(|err| {
            tracing::warn!(tool = %request.name, error = %err, "tool call failed");
            McpError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use quickchart_client::{Endpoints, RenderBackend, RenderRequest, RenderedBody, display_url};
    use quickchart_core::{AppConfig, OutputLocator};
    use serde_json::{Value, json};

    use super::*;
    use crate::pipeline::testing::{PNG_BYTES, args, texts};

    /// In-process backend: answers every request with PNG bytes or a status.
    struct StubBackend {
        status: Option<u16>,
        hits: AtomicUsize,
    }

    #[async_trait]
    impl RenderBackend for StubBackend {
        async fn render(&self, request: &RenderRequest) -> Result<RenderedBody, Error> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(Error::HttpStatus { status, url: display_url(&request.url) }),
                None => Ok(RenderedBody::Binary(PNG_BYTES.to_vec().into())),
            }
        }
    }

    struct Harness {
        server: QuickChartServer,
        backend: Arc<StubBackend>,
        home: tempfile::TempDir,
    }

    fn harness(status: Option<u16>, config: AppConfig) -> Harness {
        let backend = Arc::new(StubBackend { status, hits: AtomicUsize::new(0) });
        let home = tempfile::tempdir().unwrap();
        let ctx = ToolContext {
            endpoints: Endpoints::from_config(&config).unwrap(),
            backend: backend.clone(),
            output: OutputLocator::new(None, Some(home.path().to_path_buf())),
        };
        Harness { server: QuickChartServer::new(ToolRegistry::new(&config), ctx), backend, home }
    }

    async fn call(h: &Harness, name: &str, value: Value) -> Result<CallToolResult, McpError> {
        h.server.call(name, Some(args(value))).await.map_err(McpError::from)
    }

    #[tokio::test]
    async fn test_bar_chart_get_url() {
        let h = harness(None, AppConfig::default());
        let result = call(
            &h,
            "create-chart-using-chartjs",
            json!({"action": "get_url", "chart": {"type": "bar", "data": {"datasets": [{"data": [1, 2, 3]}]}}}),
        )
        .await
        .unwrap();

        assert!(texts(&result).iter().any(|t| t.starts_with("https://quickchart.io/chart?c=")));
        assert!(result.content.iter().any(|c| c.raw.as_image().is_some()));
        assert_eq!(std::fs::read_dir(h.home.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_pie_datasets_is_invalid_params() {
        let h = harness(None, AppConfig::default());
        let err = call(
            &h,
            "create-chart-using-chartjs",
            json!({"action": "get_url", "chart": {"type": "pie", "data": {"datasets": []}}}),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("non-empty array"));
        assert_eq!(h.backend.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_qr_save_file_writes_png() {
        let h = harness(None, AppConfig::default());
        let path = h.home.path().join("qr.png");
        let target = path.display().to_string();

        let result = call(
            &h,
            "create-qr-code",
            json!({"action": "save_file", "text": "hello", "outputPath": target.clone()}),
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), PNG_BYTES);
        assert!(texts(&result).contains(&target));
        assert_eq!(result.meta.unwrap().0["savedPath"], target);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_method_not_found() {
        let h = harness(None, AppConfig::default());
        let err = call(&h, "create-pie-chart", json!({})).await.unwrap_err();
        assert_eq!(err.code.0, -32601);
        assert!(err.message.contains("create-pie-chart"));
    }

    #[tokio::test]
    async fn test_backend_500_on_save_is_internal_error() {
        let h = harness(Some(500), AppConfig::default());
        let err = call(
            &h,
            "create-barcode",
            json!({"action": "save_file", "type": "code128", "text": "x", "outputPath": "bar.png"}),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code.0, -32603);
        assert!(err.message.contains("500"));
        assert!(!h.home.path().join("bar.png").exists());
    }

    #[tokio::test]
    async fn test_backend_500_on_get_url_degrades() {
        let h = harness(Some(500), AppConfig::default());
        let result = call(&h, "create-qr-code", json!({"text": "hello"})).await.unwrap();

        let texts = texts(&result);
        assert_eq!(texts[0], "Warning: failed to fetch QR code image");
        assert!(texts.last().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_disabled_tool_is_method_not_found() {
        let h = harness(None, AppConfig { enable_qrcode: false, ..Default::default() });
        let err = call(&h, "create-qr-code", json!({"text": "hello"})).await.unwrap_err();
        assert_eq!(err.code.0, -32601);
        assert!(!h.server.tools().iter().any(|t| t.name == "create-qr-code"));
    }

    #[tokio::test]
    async fn test_absent_arguments() {
        let h = harness(None, AppConfig::default());

        let err = h.server.call("create-qr-code", None).await.map_err(McpError::from).unwrap_err();
        assert_eq!(err.code.0, -32602);

        let help = h.server.call("get-visualization-tool-help", None).await.unwrap();
        assert_eq!(texts(&help).len(), 1);
    }

    #[tokio::test]
    async fn test_save_file_without_output_path() {
        let h = harness(None, AppConfig::default());
        let err = call(&h, "create-wordcloud", json!({"text": "a b", "action": "save_file"})).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("outputPath"));
    }

    #[tokio::test]
    async fn test_dimension_boundaries() {
        let h = harness(None, AppConfig::default());
        for (size, ok) in [(1, true), (10_000, true), (0, false), (10_001, false)] {
            let result = call(&h, "create-qr-code", json!({"text": "x", "size": size})).await;
            assert_eq!(result.is_ok(), ok, "size {size}");
        }
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let h = harness(None, AppConfig::default());
        let input = json!({"graph": "digraph { a -> b }", "layout": "neato"});

        let first = call(&h, "create-diagram-using-graphviz", input.clone()).await.unwrap();
        let second = call(&h, "create-diagram-using-graphviz", input).await.unwrap();
        assert_eq!(texts(&first), texts(&second));
        assert_eq!(first.meta.unwrap().0["chartUrl"], second.meta.unwrap().0["chartUrl"]);
    }

    #[test]
    fn test_server_info() {
        let h = harness(None, AppConfig::default());
        let info = h.server.get_info();
        assert_eq!(info.server_info.name, "mcp-quickchart");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_endpoint_overrides_flow_into_urls() {
        let config = AppConfig { base_url: Some("https://charts.internal.example".into()), ..Default::default() };
        let h = harness(None, config);
        let tool = h.server.registry.find("create-chart-using-chartjs").unwrap();
        let input = args(json!({"chart": {"type": "bar", "data": {"datasets": [{"data": [1]}]}}}));
        let Prepared::Render(plan) = tool.prepare(Some(input), &h.server.ctx.endpoints).unwrap() else {
            panic!("expected a render plan");
        };
        assert!(plan.share_url.as_str().starts_with("https://charts.internal.example/chart?c="));
        assert!(plan.links[0].url.as_str().starts_with("https://charts.internal.example/sandbox#"));
    }
}
