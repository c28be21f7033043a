//! Watermarks via `POST /watermark`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, query_pairs, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkParams {
    /// Whether to get watermarked image URL or save as file (default: get_url)
    #[serde(default, skip_serializing)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default, skip_serializing)]
    pub output_path: Option<String>,
    /// URL of the main image to watermark
    pub main_image_url: String,
    /// URL of the watermark/logo image
    pub mark_image_url: String,
    /// Watermark opacity (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Main image width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    /// Main image height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    /// Watermark width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_width: Option<u32>,
    /// Watermark height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_height: Option<u32>,
    /// Watermark size ratio relative to main image (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_ratio: Option<f64>,
    /// Watermark position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Custom X position in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_x: Option<i32>,
    /// Custom Y position in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_y: Option<i32>,
    /// Margin from edges in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
}

impl_action_params!(WatermarkParams);

pub struct WatermarkTool;

impl RenderTool for WatermarkTool {
    type Params = WatermarkParams;

    const NAME: &'static str = "create-watermark";
    const DESCRIPTION: &'static str = "Add watermarks/logos to images using QuickChart - get URL or save as file";
    const TOGGLE: ToolToggle = ToolToggle::Watermark;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/watermark-api/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "mainImageUrl": "https://example.com/photo.png",
            "markImageUrl": "https://example.com/logo.png",
            "opacity": 0.5,
            "position": "bottom-right"
        })
    }

    fn validate(params: &WatermarkParams) -> Result<(), Error> {
        validate::require_text("mainImageUrl", &params.main_image_url)?;
        validate::require_text("markImageUrl", &params.mark_image_url)?;
        validate::check_ratio("opacity", params.opacity)?;
        validate::check_ratio("markRatio", params.mark_ratio)?;
        validate::check_dimension("imageWidth", params.image_width)?;
        validate::check_dimension("imageHeight", params.image_height)?;
        validate::check_dimension("markWidth", params.mark_width)?;
        validate::check_dimension("markHeight", params.mark_height)
    }

    fn build(params: WatermarkParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let endpoint = endpoints.url(Endpoint::Watermark);
        let preview = Self::request(endpoint, &params, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        Ok(RenderPlan {
            subject: "watermark",
            chart_type: "watermark".into(),
            share_url: with_query(endpoint, &query_pairs(&params)?),
            links: vec![],
            preview,
            save,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{
        execute,
        testing::{Reply, prepare, spawn, texts},
    };

    fn images() -> Value {
        json!({"mainImageUrl": "https://example.com/a.png", "markImageUrl": "https://example.com/b.png"})
    }

    #[test]
    fn test_payload_and_share_url() {
        let mut input = images();
        input["position"] = json!("top-left");
        input["opacity"] = json!(0.4);
        let plan = prepare::<WatermarkTool>(input, &Endpoints::public().unwrap()).unwrap();

        let body = plan.preview.body.as_ref().unwrap();
        assert_eq!(body["position"], "top-left");
        assert_eq!(body["mainImageUrl"], "https://example.com/a.png");
        assert!(body.get("action").is_none());

        let pairs: Vec<(String, String)> = plan.share_url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("opacity".into(), "0.4".into())));
        assert!(pairs.contains(&("markImageUrl".into(), "https://example.com/b.png".into())));
    }

    #[test]
    fn test_opacity_bounds() {
        let with = |opacity: f64| {
            let mut input = images();
            input["opacity"] = json!(opacity);
            prepare::<WatermarkTool>(input, &Endpoints::public().unwrap())
        };
        assert!(with(0.0).is_ok());
        assert!(with(1.0).is_ok());
        let err = with(1.01).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("opacity")));
    }

    #[test]
    fn test_unknown_position_rejected() {
        let mut input = images();
        input["position"] = json!("middle");
        let err = prepare::<WatermarkTool>(input, &Endpoints::public().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("position") && msg.contains("bottom-right")));
    }

    #[test]
    fn test_mark_url_required() {
        let err = prepare::<WatermarkTool>(
            json!({"mainImageUrl": "https://example.com/a.png"}),
            &Endpoints::public().unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("markImageUrl")));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_share_url() {
        let mock = spawn(Reply::Status(502)).await;
        let plan = prepare::<WatermarkTool>(images(), &mock.ctx.endpoints).unwrap();
        let result = execute(plan, &mock.ctx).await.unwrap();

        let texts = texts(&result);
        assert_eq!(texts[0], "Warning: failed to fetch watermark image");
        assert_eq!(texts[1], "Below is the watermark URL:");
        assert!(texts[2].contains("/watermark?"));
    }
}
