//! GraphViz diagrams via `POST /graphviz`.

use quickchart_client::{Endpoint, Endpoints, Format, Method, with_query};
use quickchart_core::{Error, ToolToggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::{Action, VectorFormat, impl_action_params};
use super::validate;
use crate::pipeline::{RenderPlan, SaveTarget};
use crate::registry::RenderTool;

/// Graph layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Dot,
    Fdp,
    Neato,
    Circo,
    Twopi,
    Osage,
    Patchwork,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Dot => "dot",
            Layout::Fdp => "fdp",
            Layout::Neato => "neato",
            Layout::Circo => "circo",
            Layout::Twopi => "twopi",
            Layout::Osage => "osage",
            Layout::Patchwork => "patchwork",
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphvizParams {
    /// Whether to get graph URL or save as file
    #[serde(default)]
    pub action: Action,
    /// Path where to save the file (only used with action=save_file)
    #[serde(default)]
    pub output_path: Option<String>,
    /// DOT graph description
    pub graph: String,
    /// Graph layout algorithm (default: dot)
    #[serde(default)]
    pub layout: Layout,
    /// Output format (default: svg)
    #[serde(default)]
    pub format: VectorFormat,
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
}

impl_action_params!(GraphvizParams);

#[derive(Debug, Serialize)]
struct GraphvizPayload<'a> {
    graph: &'a str,
    layout: Layout,
    format: VectorFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

pub struct GraphvizTool;

impl RenderTool for GraphvizTool {
    type Params = GraphvizParams;

    const NAME: &'static str = "create-diagram-using-graphviz";
    const DESCRIPTION: &'static str =
        "Create graph diagrams using GraphViz - get diagram image URL or save diagram image to file";
    const TOGGLE: ToolToggle = ToolToggle::Graphviz;
    const METHOD: Method = Method::Post;
    const DOCUMENTATION: &'static str = "https://quickchart.io/documentation/graphviz-api/";

    fn usage_example() -> Value {
        json!({
            "action": "get_url",
            "graph": "digraph G { Hello -> World }",
            "layout": "dot",
            "format": "svg"
        })
    }

    fn validate(params: &GraphvizParams) -> Result<(), Error> {
        validate::require_text("graph", &params.graph)?;
        validate::check_dimension("width", params.width)?;
        validate::check_dimension("height", params.height)
    }

    fn build(params: GraphvizParams, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error> {
        let payload = |format| GraphvizPayload {
            graph: &params.graph,
            layout: params.layout,
            format,
            width: params.width,
            height: params.height,
        };

        let endpoint = endpoints.url(Endpoint::Graphviz);
        let preview = Self::request(endpoint, &payload(VectorFormat::Png), Format::Png)?;
        let save = match output_path {
            Some(output_path) => Some(SaveTarget {
                request: Self::request(endpoint, &payload(params.format), params.format.into())?,
                output_path,
            }),
            None => None,
        };

        let share_url = with_query(
            endpoint,
            &[
                ("graph".into(), params.graph.clone()),
                ("layout".into(), params.layout.as_str().into()),
                ("format".into(), params.format.as_str().into()),
            ],
        );

        Ok(RenderPlan {
            subject: "GraphViz diagram",
            chart_type: params.layout.as_str().into(),
            share_url,
            links: vec![],
            preview,
            save,
        })
    }
}
