//! Table images via `POST /v1/table` on the API host.

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
pub struct TableParams {
    /// Whether to get table URL or save as file (default: get_url)
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Table data with `title`, `columns` ({title, dataIndex, width?, align?}) and `dataSource` rows
    pub data: JsonObject,
    /// Table styling options: cellWidth, cellHeight, offsetLeft, offsetRight,
    /// fontFamily, backgroundColor, fontSize, borderColor, headerColor
    pub options: Option<JsonObject>,
}

impl_action_params!(TableParams);

#[derive(Debug, Serialize)]
struct TablePayload<'a> {
    data: &'a JsonObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a JsonObject>,
}

pub struct TableTool;

impl RenderTool for TableTool {
    type Params = TableParams;

    const NAME: &'static str = "create-table";
    const DESCRIPTION: &'static str = "Create table images using QuickChart - get URL or save as file";
    const TOGGLE: ToolToggle = ToolToggle::Table;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/apis/table-image-api/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "data": {
                "title": "Team",
                "columns": [
                    {"title": "Name", "dataIndex": "name"},
                    {"title": "Role", "dataIndex": "role"}
                ],
                "dataSource": [
                    {"name": "Ada", "role": "Engineer"},
                    {"name": "Grace", "role": "Admiral"}
                ]
            }
        })
    }

    fn validate(params: &TableParams) -> Result<(), Error> {
        validate::require_non_empty_array("data.columns", params.data.get("columns"))?;
        validate::require_array("data.dataSource", params.data.get("dataSource"))?;
        Ok(())
    }

    fn build(params: TableParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let payload = TablePayload {
            data: &params.data,
            options: params.options.as_ref().filter(|options| !options.is_empty()),
        };

        let endpoint = endpoints.url(Endpoint::Table);
        let preview = Self::request(endpoint, &payload, Format::Png)?;
        let save = output_path.map(|output_path| SaveTarget { request: preview.clone(), output_path });

        Ok(RenderPlan {
            subject: "table",
            chart_type: "table".into(),
            share_url: with_query(endpoint, &query_pairs(&payload)?),
            links: vec![],
            preview,
            save,
        })
    }
}
