//! Natural-language charts via `POST /natural`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, query_pairs, with_path_segment, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextChartParams {
    /// Whether to get chart URL or save as file
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Natural language chart description
    pub description: String,
    /// Chart width in pixels
    pub width: Option<u32>,
    /// Chart height in pixels
    pub height: Option<u32>,
    /// Background color
    pub background_color: Option<String>,
    /// First dataset values (comma-separated)
    pub data1: Option<String>,
    /// Second dataset values (comma-separated)
    pub data2: Option<String>,
    /// Data labels (comma-separated)
    pub labels: Option<String>,
    /// Chart title
    pub title: Option<String>,
}

impl_action_params!(TextChartParams);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextChartPayload<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

pub struct TextChartTool;

impl RenderTool for TextChartTool {
    type Params = TextChartParams;

    const NAME: &'static str = "create-chart-using-natural-language";
    const DESCRIPTION: &'static str =
        "Create charts from natural language descriptions - get chart image URL or save chart image to file";
    const TOGGLE: ToolToggle = ToolToggle::TextChart;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/apis/text-to-chart/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "description": "A bar chart of monthly sales",
            "labels": "Jan,Feb,Mar",
            "data1": "120,150,170",
            "title": "Sales"
        })
    }

    fn validate(params: &TextChartParams) -> Result<(), Error> {
        validate::require_text("description", &params.description)?;
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)?;
        for (field, value) in [
            ("backgroundColor", &params.background_color),
            ("data1", &params.data1),
            ("data2", &params.data2),
            ("labels", &params.labels),
            ("title", &params.title),
        ] {
            validate::optional_text(field, value.as_deref())?;
        }
        Ok(())
    }

    fn build(params: TextChartParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let payload = TextChartPayload {
            description: &params.description,
            width: params.width,
            height: params.height,
            background_color: params.background_color.as_deref(),
            data1: params.data1.as_deref(),
            data2: params.data2.as_deref(),
            labels: params.labels.as_deref(),
            title: params.title.as_deref(),
        };

        let endpoint = endpoints.url(Endpoint::TextChart);
        let preview = Self::request(endpoint, &payload, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        // Description travels in the path; the remaining options as a query.
        let options: Vec<_> = query_pairs(&payload)?
            .into_iter()
            .filter(|(key, _)| key != "description")
            .collect();
        let share_url = with_query(&with_path_segment(endpoint, &params.description)?, &options);

        Ok(RenderPlan {
            subject: "chart",
            chart_type: "natural-language".into(),
            share_url,
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
    fn test_share_url_puts_description_in_path() {
        let plan = prepare::<TextChartTool>(
            json!({"description": "sales by month", "title": "Sales"}),
            &Endpoints::public().unwrap(),
        )
        .unwrap();

        assert_eq!(plan.share_url.as_str(), "https://quickchart.io/natural/sales%20by%20month?title=Sales");
        assert_eq!(plan.chart_type, "natural-language");
        assert_eq!(plan.preview.body.as_ref().unwrap()["description"], "sales by month");
    }

    #[test]
    fn test_no_options_means_no_query() {
        let plan = prepare::<TextChartTool>(json!({"description": "pie"}), &Endpoints::public().unwrap()).unwrap();
        assert_eq!(plan.share_url.query(), None);
    }

    #[test]
    fn test_description_required() {
        let err = prepare::<TextChartTool>(json!({"title": "x"}), &Endpoints::public().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("description")));
    }

    #[test]
    fn test_blank_data_series_rejected() {
        let err = prepare::<TextChartTool>(json!({"description": "pie", "data2": ""}), &Endpoints::public().unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.starts_with("data2")));
    }
}
