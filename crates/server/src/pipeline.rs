//! Render pipeline: preview fetch, optional save, result assembly.
//!
//! A failed preview degrades to a warning block because the shareable URL is
//! still usable. A failed save aborts the call.

use std::sync::Arc;

use chrono::{Local, SecondsFormat, Utc};
use quickchart_client::{Endpoints, RenderBackend, RenderRequest, RenderedBody};
use quickchart_core::{Error, OutputLocator, output};
use rmcp::model::{CallToolResult, Content, ErrorData as McpError, JsonObject, Meta};
use serde_json::Value;
use url::Url;

/// Shared, read-only state every tool call runs against.
pub struct ToolContext {
    pub endpoints: Endpoints,
    pub backend: Arc<dyn RenderBackend>,
    pub output: OutputLocator,
}

/// An additional labelled URL shown after the main one.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Label used in `Below is the <label> URL:`.
    pub label: &'static str,
    /// Metadata key the URL is stored under.
    pub meta_key: &'static str,
    pub url: Url,
}

/// Where and in which format the caller wants the asset written.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTarget {
    pub request: RenderRequest,
    pub output_path: String,
}

/// Everything a tool decided; executing it performs the I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Human label, e.g. `chart` or `QR code`.
    pub subject: &'static str,
    /// `chartType` metadata value.
    pub chart_type: String,
    pub share_url: Url,
    pub links: Vec<Link>,
    /// Always requests PNG.
    pub preview: RenderRequest,
    pub save: Option<SaveTarget>,
}

/// Execute a plan and assemble the tool result.
pub async fn execute(plan: RenderPlan, ctx: &ToolContext) -> Result<CallToolResult, Error> {
    let subject = plan.subject;
    let share_url = plan.share_url.to_string();

    let mut meta = JsonObject::new();
    meta.insert("chartType".into(), Value::String(plan.chart_type.clone()));
    meta.insert(
        "generatedAt".into(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    meta.insert("chartUrl".into(), Value::String(share_url.clone()));

    let mut content = vec![Content::text(format!("Below is the {subject} URL:")), Content::text(share_url)];

    for link in &plan.links {
        content.push(Content::text(format!("Below is the {} URL:", link.label)));
        content.push(Content::text(link.url.to_string()));
        meta.insert(link.meta_key.into(), Value::String(link.url.to_string()));
    }

    let preview = match ctx.backend.render(&plan.preview).await {
        Ok(body) => {
            content.push(Content::text("Below is the PNG image:"));
            content.push(Content::image(body.to_base64(), "image/png"));
            Some(body)
        }
        Err(err) => {
            let detail = describe(err);
            tracing::warn!(subject, error = %detail, "preview fetch failed");
            content.insert(0, Content::text(format!("Warning: failed to fetch {subject} image")));
            content.push(Content::text(format!("Error: {detail}")));
            meta.insert("error".into(), Value::String(detail));
            None
        }
    };

    if let Some(save) = plan.save {
        let path = ctx.output.resolve(
            Some(&save.output_path),
            save.request.format.extension(),
            Local::now().naive_local(),
        );

        let body = match preview {
            Some(body) if save.request == plan.preview => body,
            _ => ctx
                .backend
                .render(&save.request)
                .await
                .map_err(|e| save_failed(subject, e))?,
        };

        let written = match &body {
            RenderedBody::Text(text) => output::write_text(&path, text).await,
            RenderedBody::Binary(bytes) => output::write_bytes(&path, bytes).await,
        };
        written.map_err(|e| save_failed(subject, e))?;

        let saved = path.display().to_string();
        tracing::info!(subject, path = %saved, bytes = body.len(), "saved rendered file");

        content.push(Content::text("Below is the saved file path:"));
        content.push(Content::text(saved.clone()));
        meta.insert("savedPath".into(), Value::String(saved));
    }

    let mut result = CallToolResult::success(content);
    result.meta = Some(Meta(meta));
    Ok(result)
}

/// Caller-facing message of an error, without the internal code prefix.
fn describe(err: Error) -> String {
    McpError::from(err).message.into_owned()
}

fn save_failed(subject: &str, err: Error) -> Error {
    Error::SaveFailed(format!("Failed to save {subject}: {}", describe(err)))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Mock QuickChart backend for pipeline and tool tests.

    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Router,
        http::{StatusCode, Uri},
        response::IntoResponse,
    };
    use quickchart_client::{Endpoints, FetchConfig, QuickChartClient};
    use quickchart_core::{Error, OutputLocator};
    use rmcp::model::{CallToolResult, JsonObject};
    use serde_json::Value;

    use super::{RenderPlan, ToolContext};
    use crate::registry::{Adapter, Prepared, RenderTool};

    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xde, 0xad, 0xbe, 0xef];
    pub const SVG_TEXT: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><text>ünï</text></svg>";

    /// How the mock backend answers every request.
    #[derive(Debug, Clone, Copy)]
    pub enum Reply {
        /// SVG text when the request asks for svg, PNG bytes otherwise.
        Image,
        Status(u16),
    }

    pub struct MockBackend {
        pub ctx: ToolContext,
        pub hits: Arc<AtomicUsize>,
        pub home: tempfile::TempDir,
    }

    impl MockBackend {
        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    /// Argument map from a `json!` literal.
    pub fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    /// Run a tool's parse, validate and build steps on a `json!` literal.
    pub fn prepare<T: RenderTool>(value: Value, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        match Adapter::<T>::boxed().prepare(Some(args(value)), endpoints)? {
            Prepared::Render(plan) => Ok(*plan),
            Prepared::Immediate(_) => panic!("expected a render plan"),
        }
    }

    /// Text blocks of a result, in order.
    pub fn texts(result: &CallToolResult) -> Vec<String> {
        result
            .content
            .iter()
            .filter_map(|c| c.raw.as_text().map(|t| t.text.clone()))
            .collect()
    }

    pub async fn spawn(reply: Reply) -> MockBackend {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let router = Router::new().fallback(move |uri: Uri, body: String| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                match reply {
                    Reply::Status(code) => {
                        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                        (status, "mock failure").into_response()
                    }
                    Reply::Image => {
                        let wants_svg = uri.query().is_some_and(|q| q.contains("format=svg"))
                            || body.contains("\"format\":\"svg\"");
                        if wants_svg { SVG_TEXT.into_response() } else { PNG_BYTES.to_vec().into_response() }
                    }
                }
            }
        });

        let addr = serve(router).await;
        let endpoints = Endpoints::with_base(&format!("http://{addr}")).unwrap();
        let backend = QuickChartClient::new(FetchConfig::default()).unwrap();
        let home = tempfile::tempdir().unwrap();

        MockBackend {
            ctx: ToolContext {
                endpoints,
                backend: Arc::new(backend),
                output: OutputLocator::new(None, Some(home.path().to_path_buf())),
            },
            hits,
            home,
        }
    }

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}
