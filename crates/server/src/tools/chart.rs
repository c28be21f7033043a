//! Chart.js rendering via `POST /chart`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, with_fragment, with_query};
use quickchart_core::{Error, ToolToggle};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{Link, RenderPlan, SaveTarget};
use crate::registry::RenderTool;

pub const CHART_TYPES: [&str; 10] = [
    "bar",
    "line",
    "pie",
    "doughnut",
    "radar",
    "polarArea",
    "scatter",
    "bubble",
    "radialGauge",
    "speedometer",
];

/// Types rendered by the radial gauge plugin.
const GAUGE_TYPES: [&str; 2] = ["radialGauge", "speedometer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Png,
    Webp,
    Jpg,
    Svg,
    Pdf,
    Base64,
}

impl From<ChartFormat> for Format {
    fn from(format: ChartFormat) -> Self {
        match format {
            ChartFormat::Png => Format::Png,
            ChartFormat::Webp => Format::Webp,
            ChartFormat::Jpg => Format::Jpg,
            ChartFormat::Svg => Format::Svg,
            ChartFormat::Pdf => Format::Pdf,
            ChartFormat::Base64 => Format::Base64,
        }
    }
}

/// How QuickChart should decode the chart configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Url,
    Base64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartParams {
    /// Whether to get the chart URL or also save the chart to a file
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Pixel width (default: 500)
    pub width: Option<u32>,
    /// Pixel height (default: 300)
    pub height: Option<u32>,
    /// Pixel ratio for Retina support, 1 or 2 (default: 2)
    pub device_pixel_ratio: Option<u8>,
    /// Output format (default: png)
    pub format: Option<ChartFormat>,
    /// Canvas background color: rgb, hex, hsl, or color names (default: transparent)
    pub background_color: Option<String>,
    /// Chart.js version: '2', '3', '4', or a specific version (default: '2.9.4')
    pub version: Option<String>,
    /// Chart configuration encoding method (default: url)
    pub encoding: Option<Encoding>,
    /// API key (optional)
    pub key: Option<String>,
    /// Chart.js configuration object with `type`, `data.datasets` and optional `options`
    pub chart: JsonObject,
}

impl_action_params!(ChartParams);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartPayload<'a> {
    width: u32,
    height: u32,
    device_pixel_ratio: u8,
    format: ChartFormat,
    background_color: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    chart: &'a JsonObject,
}

pub struct ChartTool;

impl RenderTool for ChartTool {
    type Params = ChartParams;

    const NAME: &'static str = "create-chart-using-chartjs";
    const DESCRIPTION: &'static str =
        "Create a chart using QuickChart.io - get chart image URL or save chart image to file";
    const TOGGLE: ToolToggle = ToolToggle::Chart;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "chart": {
                "type": "bar",
                "data": {
                    "labels": ["Q1", "Q2", "Q3", "Q4"],
                    "datasets": [{"label": "Revenue", "data": [50, 60, 70, 180]}]
                }
            }
        })
    }

    fn validate(params: &ChartParams) -> Result<(), Error> {
        let chart_type = params.chart.get("type").and_then(Value::as_str).unwrap_or_default();
        if !CHART_TYPES.contains(&chart_type) {
            return Err(Error::invalid(format!(
                "Invalid chart type: {chart_type}. Valid types are: {}",
                CHART_TYPES.join(", ")
            )));
        }

        let data = validate::require_object("chart.data", params.chart.get("data"))?;
        let datasets = validate::require_non_empty_array("chart.data.datasets", data.get("datasets"))?;
        for (index, dataset) in datasets.iter().enumerate() {
            if dataset.get("data").is_none_or(Value::is_null) {
                return Err(Error::invalid(format!("Dataset at index {index} must have a 'data' property")));
            }
        }

        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        validate::check_one_of("devicePixelRatio", params.device_pixel_ratio, &[1, 2])?;
        validate::optional_text("backgroundColor", params.background_color.as_deref())?;
        validate::optional_text("version", params.version.as_deref())?;
        validate::optional_text("key", params.key.as_deref())?;
        Ok(())
    }

    fn build(params: ChartParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let chart_type = params.chart.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
        let chart = normalize_gauge(params.chart.clone());
        let format = params.format.unwrap_or_default();

        let payload = |format| ChartPayload {
            width: params.width.unwrap_or(500),
            height: params.height.unwrap_or(300),
            device_pixel_ratio: params.device_pixel_ratio.unwrap_or(2),
            format,
            background_color: params.background_color.as_deref().unwrap_or("transparent"),
            version: params.version.as_deref().unwrap_or("2.9.4"),
            encoding: params.encoding,
            key: params.key.as_deref(),
            chart: &chart,
        };

        let endpoint = endpoints.url(Endpoint::Chart);
        let preview = Self::request(endpoint, &payload(ChartFormat::Png), Format::Png)?;
        let save = match output_path {
            Some(output_path) => Some(SaveTarget {
                request: Self::request(endpoint, &payload(format), format.into())?,
                output_path,
            }),
            None => None,
        };

        let chart_json = Value::Object(chart.clone()).to_string();
        Ok(RenderPlan {
            subject: "chart",
            chart_type,
            share_url: with_query(endpoint, &[("c".into(), chart_json.clone())]),
            links: vec![Link {
                label: "editor",
                meta_key: "editableUrl",
                url: with_fragment(endpoints.sandbox(), &chart_json),
            }],
            preview,
            save,
        })
    }
}

/// Route gauge aliases to the `radialGauge` renderer and label the centre
/// with the first data point as a percentage, unless the caller set a label.
fn normalize_gauge(mut chart: JsonObject) -> JsonObject {
    let is_gauge = chart
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| GAUGE_TYPES.contains(&t));
    if !is_gauge {
        return chart;
    }

    chart.insert("type".into(), Value::String("radialGauge".into()));

    let first = chart
        .get("data")
        .and_then(|d| d.get("datasets"))
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("data"))
        .and_then(|d| d.get(0))
        .and_then(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        });
    let Some(first) = first else {
        return chart;
    };

    let options = chart.entry("options").or_insert_with(|| json!({}));
    if let Value::Object(options) = options
        && let Value::Object(center) = options.entry("centerArea").or_insert_with(|| json!({}))
    {
        center.entry("text").or_insert_with(|| Value::String(format!("{first}%")));
    }
    chart
}
