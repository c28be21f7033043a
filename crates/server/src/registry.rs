//! Tool registry.
//!
//! Every rendering backend implements [`RenderTool`] once; [`Adapter`] turns
//! it into a type-erased [`ToolHandler`] that projects the untyped argument
//! map into the tool's parameter struct before any validation runs.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use quickchart_client::{Endpoints, Format, Method, RenderRequest};
use quickchart_core::{AppConfig, Error, ToolToggle};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::pipeline::RenderPlan;
use crate::tools::{self, common::ActionParams, help::HelpTool};

/// Outcome of preparing a call.
pub enum Prepared {
    /// Needs the render pipeline.
    Render(Box<RenderPlan>),
    /// Already complete, e.g. static documentation.
    Immediate(CallToolResult),
}

/// Documentation entry served by the help tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub documentation: &'static str,
    pub usage_example: Value,
}

/// Type-erased tool as seen by the protocol layer.
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn toggle(&self) -> ToolToggle;
    fn definition(&self) -> Tool;
    fn help_entry(&self) -> Option<HelpEntry>;
    fn prepare(&self, args: Option<JsonObject>, endpoints: &Endpoints) -> Result<Prepared, Error>;
}

/// One QuickChart backend: parameters, validation and request building.
pub trait RenderTool: Send + Sync + 'static {
    type Params: DeserializeOwned + JsonSchema + ActionParams;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const TOGGLE: ToolToggle;
    const METHOD: Method;
    /// QuickChart documentation page.
    const DOCUMENTATION: &'static str;

    fn usage_example() -> Value;

    /// Range, emptiness and structural checks beyond what deserialization enforces.
    fn validate(params: &Self::Params) -> Result<(), Error>;

    /// Build the render plan. `output_path` is set iff the caller asked to save.
    fn build(params: Self::Params, output_path: Option<String>, endpoints: &Endpoints) -> Result<RenderPlan, Error>;

    /// Request in this tool's transport.
    fn request<P: Serialize + ?Sized>(endpoint: &Url, payload: &P, format: Format) -> Result<RenderRequest, Error> {
        match Self::METHOD {
            Method::Get => RenderRequest::get(endpoint, payload, format),
            Method::Post => RenderRequest::post(endpoint, payload, format),
        }
    }
}

/// [`ToolHandler`] for any [`RenderTool`].
pub struct Adapter<T>(PhantomData<fn() -> T>);

impl<T: RenderTool> Adapter<T> {
    pub fn boxed() -> Box<dyn ToolHandler> {
        Box::new(Self(PhantomData))
    }
}

impl<T: RenderTool> ToolHandler for Adapter<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn toggle(&self) -> ToolToggle {
        T::TOGGLE
    }

    fn definition(&self) -> Tool {
        Tool::new(Cow::Borrowed(T::NAME), Cow::Borrowed(T::DESCRIPTION), input_schema::<T::Params>())
    }

    fn help_entry(&self) -> Option<HelpEntry> {
        Some(HelpEntry {
            name: T::NAME,
            description: T::DESCRIPTION,
            documentation: T::DOCUMENTATION,
            usage_example: T::usage_example(),
        })
    }

    fn prepare(&self, args: Option<JsonObject>, endpoints: &Endpoints) -> Result<Prepared, Error> {
        let args = args.ok_or_else(|| Error::invalid(format!("Missing arguments for {}", T::NAME)))?;
        let params: T::Params = parse_args(args)?;
        let output_path = params.save_path()?;
        T::validate(&params)?;
        let plan = T::build(params, output_path, endpoints)?;
        Ok(Prepared::Render(Box::new(plan)))
    }
}

/// Deserialize tool arguments, naming the offending field on failure.
pub fn parse_args<P: DeserializeOwned>(args: JsonObject) -> Result<P, Error> {
    serde_path_to_error::deserialize(Value::Object(args)).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if path == "." {
            Error::invalid(format!("Invalid arguments: {inner}"))
        } else {
            Error::invalid(format!("Invalid {path}: {inner}"))
        }
    })
}

/// JSON Schema object for a parameter struct.
pub fn input_schema<P: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(P);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".into(), Value::String("object".into()));
            Arc::new(map)
        }
    }
}

/// Every tool, in listing order, before enablement filtering.
fn render_tools() -> Vec<Box<dyn ToolHandler>> {
    vec![
        Adapter::<tools::chart::ChartTool>::boxed(),
        Adapter::<tools::apexcharts::ApexChartsTool>::boxed(),
        Adapter::<tools::googlecharts::GoogleChartsTool>::boxed(),
        Adapter::<tools::textchart::TextChartTool>::boxed(),
        Adapter::<tools::sparkline::SparklineTool>::boxed(),
        Adapter::<tools::graphviz::GraphvizTool>::boxed(),
        Adapter::<tools::wordcloud::WordCloudTool>::boxed(),
        Adapter::<tools::barcode::BarcodeTool>::boxed(),
        Adapter::<tools::qrcode::QrCodeTool>::boxed(),
        Adapter::<tools::table::TableTool>::boxed(),
        Adapter::<tools::watermark::WatermarkTool>::boxed(),
    ]
}

/// Enabled tools, immutable after construction.
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new(config: &AppConfig) -> Self {
        let mut tools: Vec<Box<dyn ToolHandler>> = render_tools()
            .into_iter()
            .filter(|tool| config.tool_enabled(tool.toggle()))
            .collect();

        if config.tool_enabled(ToolToggle::Help) {
            let entries = tools.iter().filter_map(|tool| tool.help_entry()).collect();
            tools.push(Box::new(HelpTool::new(entries)));
        }

        Self { tools }
    }

    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Look up an enabled tool.
    ///
    /// # Errors
    ///
    /// `MethodNotFound` for unknown and disabled names alike.
    pub fn find(&self, name: &str) -> Result<&dyn ToolHandler, Error> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
            .ok_or_else(|| Error::MethodNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_all_tools_listed_by_default() {
        let registry = ToolRegistry::new(&AppConfig::default());
        assert_eq!(
            registry.names(),
            vec![
                "create-chart-using-chartjs",
                "create-chart-using-apexcharts",
                "create-chart-using-googlecharts",
                "create-chart-using-natural-language",
                "create-sparkline-using-chartjs",
                "create-diagram-using-graphviz",
                "create-wordcloud",
                "create-barcode",
                "create-qr-code",
                "create-table",
                "create-watermark",
                "get-visualization-tool-help",
            ]
        );
    }

    #[test]
    fn test_disabled_tool_is_hidden_and_not_found() {
        let config = AppConfig { enable_barcode: false, ..Default::default() };
        let registry = ToolRegistry::new(&config);
        assert!(!registry.names().contains(&"create-barcode"));
        assert!(matches!(registry.find("create-barcode"), Err(Error::MethodNotFound(_))));
    }

    #[test]
    fn test_unknown_tool_not_found() {
        let registry = ToolRegistry::new(&AppConfig::default());
        assert!(matches!(registry.find("create-pie-chart"), Err(Error::MethodNotFound(name)) if name == "create-pie-chart"));
    }

    #[test]
    fn test_definitions_have_object_schemas() {
        let registry = ToolRegistry::new(&AppConfig::default());
        for tool in registry.list() {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")), "{}", tool.name);
            assert!(tool.description.is_some());
        }
    }

    #[test]
    fn test_chart_schema_lists_required_chart() {
        let schema = input_schema::<tools::chart::ChartParams>();
        let required = schema.get("required").and_then(Value::as_array).unwrap();
        assert!(required.contains(&json!("chart")));
        assert!(!required.contains(&json!("action")));
    }

    #[test]
    fn test_missing_args_is_invalid_params() {
        let registry = ToolRegistry::new(&AppConfig::default());
        let endpoints = Endpoints::public().unwrap();
        let result = registry.find("create-qr-code").unwrap().prepare(None, &endpoints);
        assert!(matches!(result, Err(Error::InvalidParams(msg)) if msg.contains("Missing arguments")));
    }

    #[test]
    fn test_parse_args_names_field() {
        let err = parse_args::<tools::qrcode::QrCodeParams>(object(json!({"text": "hi", "size": "big"}))).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.starts_with("Invalid size")));
    }

    #[test]
    fn test_parse_args_rejects_fractional_integers() {
        let err = parse_args::<tools::barcode::BarcodeParams>(object(json!({"type": "qr", "text": "x", "width": 10.5})))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("width")));
    }

    #[test]
    fn test_parse_args_missing_required_field() {
        let err = parse_args::<tools::qrcode::QrCodeParams>(JsonObject::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("text")));
    }

    #[test]
    fn test_parse_args_enum_lists_variants() {
        let err = parse_args::<tools::barcode::BarcodeParams>(object(json!({"type": "qr", "text": "x", "rotate": "X"})))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(msg) if msg.contains("rotate") && msg.contains("`N`")));
    }
}
