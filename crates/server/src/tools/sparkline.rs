//! Sparklines: small Chart.js images via `GET /chart`.

use quickchart_client::{Endpoint, Endpoints, Format, Method};
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
pub struct SparklineParams {
    /// Whether to get sparkline URL or save as file (default: get_url)
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Chart.js configuration for sparkline
    pub chart: JsonObject,
    /// Chart width in pixels (default: 100)
    pub width: Option<u32>,
    /// Chart height in pixels (default: 30)
    pub height: Option<u32>,
    /// Device pixel ratio, 1 or 2 (default: 2)
    pub device_pixel_ratio: Option<u8>,
    /// Background color (default: transparent)
    pub background_color: Option<String>,
}

impl_action_params!(SparklineParams);

/// Query parameters, QuickChart's short names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SparklineQuery<'a> {
    c: &'a JsonObject,
    w: u32,
    h: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_pixel_ratio: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bkg: Option<&'a str>,
}

pub struct SparklineTool;

impl RenderTool for SparklineTool {
    type Params = SparklineParams;

    const NAME: &'static str = "create-sparkline-using-chartjs";
    const DESCRIPTION: &'static str = "Create sparkline charts using Chart.js - get URL or save as file";
    const TOGGLE: ToolToggle = ToolToggle::Sparkline;
    const METHOD: Method = Method::Get;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/sparkline-api/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "chart": {"type": "sparkline", "data": {"datasets": [{"data": [140, 60, 274, 370, 199]}]}}
        })
    }

    fn validate(params: &SparklineParams) -> Result<(), Error> {
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        validate::check_one_of("devicePixelRatio", params.device_pixel_ratio, &[1, 2])?;
        validate::optional_text("backgroundColor", params.background_color.as_deref())
    }

    fn build(params: SparklineParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let query = SparklineQuery {
            c: &params.chart,
            w: params.width.unwrap_or(100),
            h: params.height.unwrap_or(30),
            device_pixel_ratio: params.device_pixel_ratio,
            bkg: params.background_color.as_deref(),
        };

        let preview = Self::request(endpoints.url(Endpoint::Sparkline), &query, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        Ok(RenderPlan {
            subject: "sparkline",
            chart_type: "sparkline".into(),
            share_url: preview.url.clone(),
            links: vec![],
            preview,
            save,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::prepare;

    fn query(plan: &RenderPlan) -> Vec<(String, String)> {
        plan.share_url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_defaults_and_short_names() {
        let plan = prepare::<SparklineTool>(
            json!({"chart": {"type": "sparkline", "data": {"datasets": [{"data": [1, 2]}]}}}),
            &Endpoints::public().unwrap(),
        )
        .unwrap();

        let pairs = query(&plan);
        assert!(pairs.contains(&("w".into(), "100".into())));
        assert!(pairs.contains(&("h".into(), "30".into())));
        assert!(pairs.iter().any(|(k, v)| k == "c" && v.contains("\"sparkline\"")));
        assert!(!pairs.iter().any(|(k, _)| k == "bkg" || k == "devicePixelRatio"));
        assert_eq!(plan.preview.method, Method::Get);
        assert_eq!(plan.share_url, plan.preview.url);
    }

    #[test]
    fn test_background_maps_to_bkg() {
        let plan = prepare::<SparklineTool>(
            json!({"chart": {"type": "line"}, "backgroundColor": "white", "devicePixelRatio": 1}),
            &Endpoints::public().unwrap(),
        )
        .unwrap();

        let pairs = query(&plan);
        assert!(pairs.contains(&("bkg".into(), "white".into())));
        assert!(pairs.contains(&("devicePixelRatio".into(), "1".into())));
    }

    #[test]
    fn test_chart_must_be_object() {
        let err = prepare::<SparklineTool>(json!({"chart": "line"}), &Endpoints::public().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("chart")));
    }
}
