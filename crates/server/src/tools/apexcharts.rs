//! ApexCharts rendering via `POST /apex-charts/render`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, query_pairs, with_query};
use quickchart_core::{Error, ToolToggle};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApexChartsParams {
    /// Whether to get chart URL or save as file (default: get_url)
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Apex Charts JSON configuration
    pub config: JsonObject,
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
    /// Apex Charts version to use
    pub apex_charts_version: Option<String>,
}

impl_action_params!(ApexChartsParams);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApexPayload<'a> {
    config: &'a JsonObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apex_charts_version: Option<&'a str>,
}

pub struct ApexChartsTool;

impl RenderTool for ApexChartsTool {
    type Params = ApexChartsParams;

    const NAME: &'static str = "create-chart-using-apexcharts";
    const DESCRIPTION: &'static str = "Create charts using Apex Charts - get URL or save as file";
    const TOGGLE: ToolToggle = ToolToggle::ApexCharts;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/apex-charts-image-rendering/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "config": {
                "chart": {"type": "line"},
                "series": [{"name": "Sales", "data": [31, 40, 35, 50, 49, 60]}],
                "xaxis": {"categories": [1991, 1992, 1993, 1994, 1995, 1996]}
            },
            "width": 500,
            "height": 300
        })
    }

    fn validate(params: &ApexChartsParams) -> Result<(), Error> {
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        validate::optional_text("apexChartsVersion", params.apex_charts_version.as_deref())
    }

    fn build(params: ApexChartsParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let payload = ApexPayload {
            config: &params.config,
            width: params.width,
            height: params.height,
            apex_charts_version: params.apex_charts_version.as_deref(),
        };

        let endpoint = endpoints.url(Endpoint::ApexCharts);
        let preview = Self::request(endpoint, &payload, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        Ok(RenderPlan {
            subject: "chart",
            chart_type: "apexcharts".into(),
            share_url: with_query(endpoint, &query_pairs(&payload)?),
            links: vec![],
            preview,
            save,
        })
    }
}
