//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (QUICKCHART_*)
//! 2. TOML config file (if QUICKCHART_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (QUICKCHART_*)
/// 2. TOML config file (if QUICKCHART_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global base URL for every endpoint, e.g. a self-hosted QuickChart.
    ///
    /// Set via QUICKCHART_BASE_URL environment variable.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Legacy alias for `base_url`, consulted only when `base_url` is unset.
    ///
    /// Set via QUICKCHART_HOST environment variable.
    #[serde(default)]
    pub host: Option<String>,

    /// Full URL of the Chart.js endpoint. Set via QUICKCHART_CHART_URL.
    #[serde(default)]
    pub chart_url: Option<String>,

    /// Full URL of the QR code endpoint. Set via QUICKCHART_QRCODE_URL.
    #[serde(default)]
    pub qrcode_url: Option<String>,

    /// Full URL of the sparkline endpoint. Set via QUICKCHART_SPARKLINE_URL.
    #[serde(default)]
    pub sparkline_url: Option<String>,

    /// Full URL of the ApexCharts endpoint. Set via QUICKCHART_APEXCHARTS_URL.
    #[serde(default)]
    pub apexcharts_url: Option<String>,

    /// Full URL of the Google Charts endpoint. Set via QUICKCHART_GOOGLECHARTS_URL.
    #[serde(default)]
    pub googlecharts_url: Option<String>,

    /// Full URL of the barcode endpoint. Set via QUICKCHART_BARCODE_URL.
    #[serde(default)]
    pub barcode_url: Option<String>,

    /// Full URL of the table endpoint. Set via QUICKCHART_TABLE_URL.
    #[serde(default)]
    pub table_url: Option<String>,

    /// Full URL of the word cloud endpoint. Set via QUICKCHART_WORDCLOUD_URL.
    #[serde(default)]
    pub wordcloud_url: Option<String>,

    /// Full URL of the GraphViz endpoint. Set via QUICKCHART_GRAPHVIZ_URL.
    #[serde(default)]
    pub graphviz_url: Option<String>,

    /// Full URL of the natural language chart endpoint. Set via QUICKCHART_TEXTCHART_URL.
    #[serde(default)]
    pub textchart_url: Option<String>,

    /// Full URL of the watermark endpoint. Set via QUICKCHART_WATERMARK_URL.
    #[serde(default)]
    pub watermark_url: Option<String>,

    /// Base directory for relative and generated output paths.
    ///
    /// Set via QUICKCHART_DEFAULT_OUTPUT_DIR environment variable. Ignored
    /// unless absolute and existing.
    #[serde(default)]
    pub default_output_dir: Option<PathBuf>,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via QUICKCHART_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via QUICKCHART_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_true")]
    pub enable_chart: bool,
    #[serde(default = "default_true")]
    pub enable_apexcharts: bool,
    #[serde(default = "default_true")]
    pub enable_googlecharts: bool,
    #[serde(default = "default_true")]
    pub enable_textchart: bool,
    #[serde(default = "default_true")]
    pub enable_sparkline: bool,
    #[serde(default = "default_true")]
    pub enable_graphviz: bool,
    #[serde(default = "default_true")]
    pub enable_wordcloud: bool,
    #[serde(default = "default_true")]
    pub enable_barcode: bool,
    #[serde(default = "default_true")]
    pub enable_qrcode: bool,
    #[serde(default = "default_true")]
    pub enable_table: bool,
    #[serde(default = "default_true")]
    pub enable_watermark: bool,
    #[serde(default = "default_true")]
    pub enable_help: bool,
}

/// Per-tool enablement switch, one per `QUICKCHART_ENABLE_<TOOL>` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolToggle {
    Chart,
    ApexCharts,
    GoogleCharts,
    TextChart,
    Sparkline,
    Graphviz,
    WordCloud,
    Barcode,
    QrCode,
    Table,
    Watermark,
    Help,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            host: None,
            chart_url: None,
            qrcode_url: None,
            sparkline_url: None,
            apexcharts_url: None,
            googlecharts_url: None,
            barcode_url: None,
            table_url: None,
            wordcloud_url: None,
            graphviz_url: None,
            textchart_url: None,
            watermark_url: None,
            default_output_dir: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            enable_chart: true,
            enable_apexcharts: true,
            enable_googlecharts: true,
            enable_textchart: true,
            enable_sparkline: true,
            enable_graphviz: true,
            enable_wordcloud: true,
            enable_barcode: true,
            enable_qrcode: true,
            enable_table: true,
            enable_watermark: true,
            enable_help: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Global base URL, preferring `base_url` over the `host` alias.
    ///
    /// Blank values count as unset.
    pub fn global_base_url(&self) -> Option<&str> {
        [self.base_url.as_deref(), self.host.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Whether the given tool should be listed and callable.
    pub fn tool_enabled(&self, toggle: ToolToggle) -> bool {
        match toggle {
            ToolToggle::Chart => self.enable_chart,
            ToolToggle::ApexCharts => self.enable_apexcharts,
            ToolToggle::GoogleCharts => self.enable_googlecharts,
            ToolToggle::TextChart => self.enable_textchart,
            ToolToggle::Sparkline => self.enable_sparkline,
            ToolToggle::Graphviz => self.enable_graphviz,
            ToolToggle::WordCloud => self.enable_wordcloud,
            ToolToggle::Barcode => self.enable_barcode,
            ToolToggle::QrCode => self.enable_qrcode,
            ToolToggle::Table => self.enable_table,
            ToolToggle::Watermark => self.enable_watermark,
            ToolToggle::Help => self.enable_help,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `QUICKCHART_`
    /// 2. TOML file from `QUICKCHART_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("QUICKCHART_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("QUICKCHART_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.host.is_none());
        assert!(config.chart_url.is_none());
        assert!(config.default_output_dir.is_none());
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.enable_chart);
        assert!(config.enable_help);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_global_base_url_prefers_base_url() {
        let config = AppConfig {
            base_url: Some("https://charts.internal".into()),
            host: Some("https://legacy.internal".into()),
            ..Default::default()
        };
        assert_eq!(config.global_base_url(), Some("https://charts.internal"));
    }

    #[test]
    fn test_global_base_url_falls_back_to_host() {
        let config = AppConfig { base_url: Some("  ".into()), host: Some("https://legacy.internal".into()), ..Default::default() };
        assert_eq!(config.global_base_url(), Some("https://legacy.internal"));
    }

    #[test]
    fn test_global_base_url_unset() {
        assert_eq!(AppConfig::default().global_base_url(), None);
    }

    #[test]
    fn test_tool_enabled() {
        let config = AppConfig { enable_barcode: false, ..Default::default() };
        assert!(!config.tool_enabled(ToolToggle::Barcode));
        assert!(config.tool_enabled(ToolToggle::QrCode));
    }

    #[test]
    fn test_toml_and_env_layers() {
        let toml = r#"
            base_url = "https://from-file.example"
            timeout_ms = 5000
            enable_watermark = false
        "#;
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(toml))
            .merge(Serialized::default("timeout_ms", 7000));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://from-file.example"));
        assert_eq!(config.timeout_ms, 7000);
        assert!(!config.enable_watermark);
        assert!(config.enable_chart);
    }

    #[test]
    fn test_from_figment_rejects_invalid() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Serialized::default("timeout_ms", 1));
        let result = AppConfig::from_figment(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }
}
