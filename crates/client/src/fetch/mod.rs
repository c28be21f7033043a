//! HTTP fetch adapter for the QuickChart rendering API.
//!
//! ### Transport
//! - GET with a query string for lightweight endpoints (QR, barcode, sparkline)
//! - POST with a JSON body for configuration-heavy endpoints
//!
//! ### Decoding
//! - `svg` responses are decoded as UTF-8 text, everything else as raw bytes
//!
//! ### Failure
//! - Non-2xx responses carry the HTTP status
//! - Transport failures carry the reqwest error text
//! - No retries; the caller decides whether to try again

pub mod url;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use reqwest::{Client, Url, header};
use serde::Serialize;
use serde_json::Value;

pub use self::url::{display_url, query_pairs, with_fragment, with_path_segment, with_query};

use quickchart_core::Error;

/// Output format of a rendered asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Png,
    Webp,
    Jpg,
    Svg,
    Pdf,
    Base64,
}

impl Format {
    /// File extension used when saving.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Webp => "webp",
            Format::Jpg => "jpg",
            Format::Svg => "svg",
            Format::Pdf => "pdf",
            Format::Base64 => "txt",
        }
    }

    /// Whether the response is decoded as text.
    pub fn is_text(self) -> bool {
        matches!(self, Format::Svg)
    }

    fn accept(self) -> &'static str {
        if self.is_text() { "image/svg+xml,*/*" } else { "image/*,*/*" }
    }
}

/// HTTP method used for a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully built request to one QuickChart endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub method: Method,
    /// Endpoint URL, including the query string for GET requests.
    pub url: Url,
    /// JSON body for POST requests.
    pub body: Option<Value>,
    /// Decoding policy for the response.
    pub format: Format,
}

impl RenderRequest {
    /// GET request with `payload` flattened into the query string.
    pub fn get<T: Serialize + ?Sized>(endpoint: &Url, payload: &T, format: Format) -> Result<Self, Error> {
        let pairs = query_pairs(payload)?;
        Ok(Self { method: Method::Get, url: with_query(endpoint, &pairs), body: None, format })
    }

    /// POST request with `payload` as the JSON body.
    pub fn post<T: Serialize + ?Sized>(endpoint: &Url, payload: &T, format: Format) -> Result<Self, Error> {
        let body = serde_json::to_value(payload).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(Self { method: Method::Post, url: endpoint.clone(), body: Some(body), format })
    }
}

/// Response body of a render call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    Text(String),
    Binary(Bytes),
}

impl RenderedBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RenderedBody::Text(text) => text.as_bytes(),
            RenderedBody::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base64 of the raw body, for inline image content.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.as_bytes())
    }
}

/// Anything that can execute a [`RenderRequest`].
#[async_trait]
pub trait RenderBackend: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedBody, Error>;
}

/// Configuration for the QuickChart client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: browser-like, some hosts block bare clients)
    pub user_agent: String,

    /// Request timeout (default: 30s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&quickchart_core::AppConfig> for FetchConfig {
    fn from(config: &quickchart_core::AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// reqwest-backed QuickChart client.
pub struct QuickChartClient {
    http: Client,
    config: FetchConfig,
}

impl QuickChartClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::FetchTimeout(format!("no response within {}ms", self.config.timeout.as_millis()))
        } else {
            Error::Network(err.to_string())
        }
    }
}

#[async_trait]
impl RenderBackend for QuickChartClient {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedBody, Error> {
        let start = Instant::now();

        let builder = match request.method {
            Method::Get => self.http.get(request.url.clone()),
            Method::Post => {
                let builder = self.http.post(request.url.clone());
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        let response = builder
            .header(header::ACCEPT, request.format.accept())
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %display_url(&request.url), "render request rejected");
            return Err(Error::HttpStatus { status: status.as_u16(), url: display_url(&request.url) });
        }

        let body = if request.format.is_text() {
            RenderedBody::Text(response.text().await.map_err(|e| self.map_send_error(e))?)
        } else {
            RenderedBody::Binary(response.bytes().await.map_err(|e| self.map_send_error(e))?)
        };

        tracing::debug!(
            "rendered {} in {}ms ({} bytes)",
            display_url(&request.url),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(body)
    }
}
