//! Word clouds via `POST /wordcloud`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, query_pairs, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, VectorFormat, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WordCase {
    Upper,
    Lower,
    None,
}

/// Word cloud arguments. Styling fields serialize straight into the payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudParams {
    /// Whether to get word cloud URL or save as file (default: get_url)
    #[serde(default, skip_serializing)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default, skip_serializing)]
    pub output_path: Option<String>,
    /// Input text for word cloud generation
    pub text: String,
    /// Output format (default: svg)
    #[serde(default, skip_serializing)]
    pub format: VectorFormat,
    /// Image width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Image height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Background color - rgb, hex, hsl, or color names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Font family to use for words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font weight (normal, bold, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Google Fonts to load (comma-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_google_fonts: Option<String>,
    /// Largest font size for most frequent words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    /// Frequency scaling method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    /// Pixel spacing between words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Maximum word rotation angle in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Maximum number of words to display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_words: Option<u32>,
    /// Minimum word character length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_word_length: Option<u32>,
    /// Word case transformation
    #[serde(rename = "case", skip_serializing_if = "Option::is_none")]
    pub case_mode: Option<WordCase>,
    /// Array of color values for words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Remove common stopwords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_stopwords: Option<bool>,
    /// Remove symbols and extra characters from words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_words: Option<bool>,
    /// Language code for stopword removal (e.g., 'en', 'es')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Treat input text as a list of words rather than sentences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_word_list: Option<bool>,
}

impl_action_params!(WordCloudParams);

#[derive(Debug, Serialize)]
struct WordCloudPayload<'a> {
    format: VectorFormat,
    #[serde(flatten)]
    params: &'a WordCloudParams,
}

pub struct WordCloudTool;

impl RenderTool for WordCloudTool {
    type Params = WordCloudParams;

    const NAME: &'static str = "create-wordcloud";
    const DESCRIPTION: &'static str = "Create a word cloud using QuickChart.io - get URL or save as file";
    const TOGGLE: ToolToggle = ToolToggle::WordCloud;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/word-cloud-api/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "text": "To be or not to be, that is the question",
            "format": "png",
            "removeStopwords": true
        })
    }

    fn validate(params: &WordCloudParams) -> Result<(), Error> {
        validate::require_text("text", &params.text)?;
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        for (field, value) in [
            ("backgroundColor", &params.background_color),
            ("fontFamily", &params.font_family),
            ("fontWeight", &params.font_weight),
            ("loadGoogleFonts", &params.load_google_fonts),
            ("scale", &params.scale),
            ("language", &params.language),
        ] {
            validate::optional_text(field, value.as_deref())?;
        }
        Ok(())
    }

    fn build(params: WordCloudParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let endpoint = endpoints.url(Endpoint::WordCloud);
        let requested = WordCloudPayload { format: params.format, params: &params };
        let png = WordCloudPayload { format: VectorFormat::Png, params: &params };
        let preview = Self::request(endpoint, &png, Format::Png)?;
        let save = match output_path {
            Some(output_path) => Some(SaveTarget {
                request: Self::request(endpoint, &requested, params.format.into())?,
                output_path,
            }),
            None => None,
        };

        Ok(RenderPlan {
            subject: "word cloud",
            chart_type: "wordcloud".into(),
            share_url: with_query(endpoint, &query_pairs(&requested)?),
            links: vec![],
            preview,
            save,
        })
    }
}
