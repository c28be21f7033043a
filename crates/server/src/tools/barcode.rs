//! Barcodes via `GET /barcode`.

use quickchart_client::{Endpoint, Endpoints, Format, Method};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

/// N=Normal, R=Right 90°, L=Left 90°, I=Inverted 180°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Rotation {
    N,
    R,
    L,
    I,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeParams {
    /// Whether to get barcode URL or save as file
    #[serde(default, skip_serializing)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default, skip_serializing)]
    pub output_path: Option<String>,
    /// Barcode type (e.g., qr, code128, ean13, datamatrix, upca, etc.)
    #[serde(rename = "type")]
    pub barcode_type: String,
    /// Data to encode in the barcode
    pub text: String,
    /// Barcode width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Barcode height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Scale factor, 1 to 10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Include human-readable text below barcode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_text: Option<bool>,
    /// Rotation: N=Normal, R=Right 90°, L=Left 90°, I=Inverted 180°
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<Rotation>,
}

impl_action_params!(BarcodeParams);

pub struct BarcodeTool;

impl RenderTool for BarcodeTool {
    type Params = BarcodeParams;

    const NAME: &'static str = "create-barcode";
    const DESCRIPTION: &'static str =
        "Create barcodes using QuickChart - get barcode image URL or save barcode image to file";
    const TOGGLE: ToolToggle = ToolToggle::Barcode;
    const METHOD: Method = Method::Get;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/barcode-api/";

    fn usage_example() -> Value {
        json!({"action": "get_url", "type": "code128", "text": "Hello World", "includeText": true})
    }

    fn validate(params: &BarcodeParams) -> Result<(), Error> {
        validate::require_text("type", &params.barcode_type)?;
        validate::require_text("text", &params.text)?;
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        validate::check_range("scale", params.scale, 1, 10)
    }

    fn build(params: BarcodeParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let preview = Self::request(endpoints.url(Endpoint::Barcode), &params, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        Ok(RenderPlan {
            subject: "barcode",
            chart_type: "barcode".into(),
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

    #[test]
    fn test_query_carries_type_and_text() {
        let plan = prepare::<BarcodeTool>(
            json!({"type": "code128", "text": "ABC 123", "includeText": true, "rotate": "R"}),
            &Endpoints::public().unwrap(),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = plan.share_url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("type".into(), "code128".into())));
        assert!(pairs.contains(&("text".into(), "ABC 123".into())));
        assert!(pairs.contains(&("includeText".into(), "true".into())));
        assert!(pairs.contains(&("rotate".into(), "R".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "action" || k == "outputPath"));
        assert!(plan.share_url.as_str().starts_with("https://quickchart.io/barcode?"));
    }

    #[test]
    fn test_scale_bounds() {
        let endpoints = Endpoints::public().unwrap();
        let with_scale = |scale: u32| prepare::<BarcodeTool>(json!({"type": "qr", "text": "x", "scale": scale}), &endpoints);
        assert!(with_scale(1).is_ok());
        assert!(with_scale(10).is_ok());
        assert!(with_scale(0).is_err());
        let err = with_scale(11).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("scale")));
    }

    #[test]
    fn test_blank_type_rejected() {
        let err = prepare::<BarcodeTool>(json!({"type": " ", "text": "x"}), &Endpoints::public().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.starts_with("type")));
    }

    #[test]
    fn test_save_without_output_path_rejected() {
        let err = prepare::<BarcodeTool>(
            json!({"type": "qr", "text": "x", "action": "save_file"}),
            &Endpoints::public().unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("outputPath")));
    }
}
