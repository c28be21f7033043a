//! QuickChart endpoint resolution.
//!
//! Each sub-API resolves once at startup with the precedence
//! per-endpoint override → global base URL + path → public default.
//! The table API lives on `api.quickchart.io` unless a global base is set.

use quickchart_core::{AppConfig, ConfigError};
use url::Url;

/// Public QuickChart host.
pub const DEFAULT_BASE_URL: &str = "https://quickchart.io";

/// Public host of the table API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.quickchart.io";

/// One QuickChart rendering sub-API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chart,
    QrCode,
    Sparkline,
    ApexCharts,
    GoogleCharts,
    Barcode,
    Table,
    WordCloud,
    Graphviz,
    TextChart,
    Watermark,
}

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::Chart,
        Endpoint::QrCode,
        Endpoint::Sparkline,
        Endpoint::ApexCharts,
        Endpoint::GoogleCharts,
        Endpoint::Barcode,
        Endpoint::Table,
        Endpoint::WordCloud,
        Endpoint::Graphviz,
        Endpoint::TextChart,
        Endpoint::Watermark,
    ];

    /// Path relative to the service base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Chart | Endpoint::Sparkline => "/chart",
            Endpoint::QrCode => "/qr",
            Endpoint::ApexCharts => "/apex-charts/render",
            Endpoint::GoogleCharts => "/google-charts/render",
            Endpoint::Barcode => "/barcode",
            Endpoint::Table => "/v1/table",
            Endpoint::WordCloud => "/wordcloud",
            Endpoint::Graphviz => "/graphviz",
            Endpoint::TextChart => "/natural",
            Endpoint::Watermark => "/watermark",
        }
    }

    /// Config key of the per-endpoint override.
    pub fn config_key(self) -> &'static str {
        match self {
            Endpoint::Chart => "chart_url",
            Endpoint::QrCode => "qrcode_url",
            Endpoint::Sparkline => "sparkline_url",
            Endpoint::ApexCharts => "apexcharts_url",
            Endpoint::GoogleCharts => "googlecharts_url",
            Endpoint::Barcode => "barcode_url",
            Endpoint::Table => "table_url",
            Endpoint::WordCloud => "wordcloud_url",
            Endpoint::Graphviz => "graphviz_url",
            Endpoint::TextChart => "textchart_url",
            Endpoint::Watermark => "watermark_url",
        }
    }

    fn override_value(self, config: &AppConfig) -> Option<&str> {
        let value = match self {
            Endpoint::Chart => &config.chart_url,
            Endpoint::QrCode => &config.qrcode_url,
            Endpoint::Sparkline => &config.sparkline_url,
            Endpoint::ApexCharts => &config.apexcharts_url,
            Endpoint::GoogleCharts => &config.googlecharts_url,
            Endpoint::Barcode => &config.barcode_url,
            Endpoint::Table => &config.table_url,
            Endpoint::WordCloud => &config.wordcloud_url,
            Endpoint::Graphviz => &config.graphviz_url,
            Endpoint::TextChart => &config.textchart_url,
            Endpoint::Watermark => &config.watermark_url,
        };
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Resolved, read-only endpoint table.
#[derive(Debug, Clone)]
pub struct Endpoints {
    urls: Vec<Url>,
    sandbox: Url,
}

impl Endpoints {
    /// Resolve every endpoint from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending key when an
    /// override or the global base is not an absolute http(s) URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let global = config.global_base_url();
        let base_key = if config.base_url.as_deref().map(str::trim).is_some_and(|s| !s.is_empty()) {
            "base_url"
        } else {
            "host"
        };

        let mut urls = Vec::with_capacity(Endpoint::ALL.len());
        for endpoint in Endpoint::ALL {
            let url = match (endpoint.override_value(config), global) {
                (Some(full), _) => parse_http_url(endpoint.config_key(), full)?,
                (None, Some(base)) => parse_http_url(base_key, &join(base, endpoint.path()))?,
                (None, None) if endpoint == Endpoint::Table => {
                    parse_http_url(endpoint.config_key(), &join(DEFAULT_API_BASE_URL, endpoint.path()))?
                }
                (None, None) => parse_http_url(endpoint.config_key(), &join(DEFAULT_BASE_URL, endpoint.path()))?,
            };
            urls.push(url);
        }

        let sandbox = parse_http_url(base_key, &join(global.unwrap_or(DEFAULT_BASE_URL), "/sandbox"))?;

        Ok(Self { urls, sandbox })
    }

    /// Public QuickChart endpoints.
    pub fn public() -> Result<Self, ConfigError> {
        Self::from_config(&AppConfig::default())
    }

    /// Every endpoint under one base URL.
    pub fn with_base(base: &str) -> Result<Self, ConfigError> {
        Self::from_config(&AppConfig { base_url: Some(base.to_string()), ..Default::default() })
    }

    pub fn url(&self, endpoint: Endpoint) -> &Url {
        &self.urls[endpoint.index()]
    }

    /// Chart.js sandbox editor, used for editor links.
    pub fn sandbox(&self) -> &Url {
        &self.sandbox
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::Invalid { field: field.to_string(), reason: format!("{raw}: {e}") })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("{raw}: must be an absolute http(s) URL"),
        }),
    }
}
