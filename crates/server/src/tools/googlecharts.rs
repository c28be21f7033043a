//! Google Charts rendering via `POST /google-charts/render`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

const DEFAULT_PACKAGES: &str = "corechart";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleChartsParams {
    /// Whether to get chart URL or save as file
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// JavaScript drawChart function code
    pub code: String,
    /// Google Charts packages to load (default: 'corechart')
    pub packages: Option<String>,
    /// Chart width in pixels
    pub width: Option<u32>,
    /// Chart height in pixels
    pub height: Option<u32>,
    /// Google Maps API key (for geo charts)
    pub maps_api_key: Option<String>,
}

impl_action_params!(GoogleChartsParams);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GooglePayload<'a> {
    code: &'a str,
    packages: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maps_api_key: Option<&'a str>,
}

pub struct GoogleChartsTool;

impl RenderTool for GoogleChartsTool {
    type Params = GoogleChartsParams;

    const NAME: &'static str = "create-chart-using-googlecharts";
    const DESCRIPTION: &'static str =
        "Create charts using Google Charts - get chart image URL or save chart image to file";
    const TOGGLE: ToolToggle = ToolToggle::GoogleCharts;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/google-charts-image-server/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "code": "const data = google.visualization.arrayToDataTable([['Task', 'Hours'], ['Work', 11], ['Sleep', 7]]); const chart = new google.visualization.PieChart(document.getElementById('chart')); chart.draw(data);",
            "packages": "corechart"
        })
    }

    fn validate(params: &GoogleChartsParams) -> Result<(), Error> {
        validate::require_text("code", &params.code)?;
        validate::optional_text("packages", params.packages.as_deref())?;
        validate::optional_text("mapsApiKey", params.maps_api_key.as_deref())?;
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)
    }

    fn build(params: GoogleChartsParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let packages = params.packages.as_deref().unwrap_or(DEFAULT_PACKAGES);
        let payload = GooglePayload {
            code: &params.code,
            packages,
            width: params.width,
            height: params.height,
            maps_api_key: params.maps_api_key.as_deref(),
        };

        let endpoint = endpoints.url(Endpoint::GoogleCharts);
        let preview = Self::request(endpoint, &payload, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        // The maps key stays out of anything the caller might share.
        let mut share = vec![("code".to_string(), params.code.clone())];
        if packages != DEFAULT_PACKAGES {
            share.push(("packages".into(), packages.to_string()));
        }

        Ok(RenderPlan {
            subject: "chart",
            chart_type: packages.to_string(),
            share_url: with_query(endpoint, &share),
            links: vec![],
            preview,
            save,
        })
    }
}
