//! QR codes via `GET /qr`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, query_pairs, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Png,
    Svg,
    Base64,
}

impl From<QrFormat> for Format {
    fn from(format: QrFormat) -> Self {
        match format {
            QrFormat::Png => Format::Png,
            QrFormat::Svg => Format::Svg,
            QrFormat::Base64 => Format::Base64,
        }
    }
}

/// Error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeParams {
    /// Whether to get QR code URL or save as file
    #[serde(default, skip_serializing)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default, skip_serializing)]
    pub output_path: Option<String>,
    /// Content of the QR code (URL, text, etc.)
    pub text: String,
    /// Output format (default: png)
    #[serde(skip_serializing)]
    pub format: Option<QrFormat>,
    /// Image dimensions in pixels (default: 150)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Whitespace around QR image (default: 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    /// Hex color for QR grid cells (default: black)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
    /// Hex color for background (default: white, use '0000' for transparent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
    /// Error correction level (default: M)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec_level: Option<EcLevel>,
    /// URL of center image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_image_url: Option<String>,
    /// Center image size ratio (0.0-1.0, default: 0.3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_image_size_ratio: Option<f64>,
    /// Text below QR code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Caption font family (default: 'sans-serif')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_font_family: Option<String>,
    /// Caption font size (default: 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_font_size: Option<u32>,
    /// Caption text color (default: black)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_font_color: Option<String>,
}

impl_action_params!(QrCodeParams);

#[derive(Debug, Serialize)]
struct QrQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<QrFormat>,
    #[serde(flatten)]
    params: &'a QrCodeParams,
}

pub struct QrCodeTool;

impl RenderTool for QrCodeTool {
    type Params = QrCodeParams;

    const NAME: &'static str = "create-qr-code";
    const DESCRIPTION: &'static str =
        "Create QR codes using QuickChart - get QR code image URL or save QR code image to file";
    const TOGGLE: ToolToggle = ToolToggle::QrCode;
    const METHOD: Method = Method::Get;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/qr-codes/";

    fn usage_example() -> Value {
        json!({"action": "get_url", "text": "https://quickchart.io", "size": 300, "ecLevel": "H"})
    }

    fn validate(params: &QrCodeParams) -> Result<(), Error> {
        validate::require_text("text", &params.text)?;
        validate::check_dimension("size", params.size)?;
        validate::check_range("margin", params.margin, 0, 100)?;
        validate::check_range("captionFontSize", params.caption_font_size, 1, 100)?;
        validate::check_ratio("centerImageSizeRatio", params.center_image_size_ratio)?;
        for (field, value) in [
            ("dark", &params.dark),
            ("light", &params.light),
            ("centerImageUrl", &params.center_image_url),
            ("caption", &params.caption),
            ("captionFontFamily", &params.caption_font_family),
            ("captionFontColor", &params.caption_font_color),
        ] {
            validate::optional_text(field, value.as_deref())?;
        }
        Ok(())
    }

    fn build(params: QrCodeParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let endpoint = endpoints.url(Endpoint::QrCode);
        let query = |format| QrQuery { format, params: &params };

        let preview = Self::request(endpoint, &query(Some(QrFormat::Png)), Format::Png)?;
        let save = match output_path {
            Some(output_path) => {
                let format = params.format.unwrap_or_default();
                let request = Self::request(endpoint, &query(Some(format)), format.into())?;
                Some(SaveTarget { request, output_path })
            }
            None => None,
        };

        Ok(RenderPlan {
            subject: "QR code",
            chart_type: "qrcode".into(),
            share_url: with_query(endpoint, &query_pairs(&query(params.format))?),
            links: vec![],
            preview,
            save,
        })
    }
}
