//! `get-visualization-tool-help`: static documentation for the enabled tools.

use std::borrow::Cow;

use quickchart_client::Endpoints;
use quickchart_core::{Error, ToolToggle};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::registry::{HelpEntry, Prepared, ToolHandler, input_schema, parse_args};

/// The help tool takes no arguments.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HelpParams {}

pub struct HelpTool {
    entries: Vec<HelpEntry>,
}

impl HelpTool {
    pub const NAME: &'static str = "get-visualization-tool-help";

    pub fn new(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }

    fn render(&self) -> Result<String, Error> {
        let by_name: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|entry| serde_json::to_value(entry).map(|value| (entry.name.to_string(), value)))
            .collect::<Result<_, _>>()
            .map_err(|e| Error::Encode(e.to_string()))?;
        serde_json::to_string_pretty(&by_name).map_err(|e| Error::Encode(e.to_string()))
    }
}

impl ToolHandler for HelpTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn toggle(&self) -> ToolToggle {
        ToolToggle::Help
    }

    fn definition(&self) -> Tool {
        Tool::new(
            Cow::Borrowed(Self::NAME),
            Cow::Borrowed("Get documentation, parameters and a usage example for every visualization tool"),
            input_schema::<HelpParams>(),
        )
    }

    fn help_entry(&self) -> Option<HelpEntry> {
        None
    }

    fn prepare(&self, args: Option<JsonObject>, _endpoints: &Endpoints) -> Result<Prepared, Error> {
        if let Some(args) = args {
            parse_args::<HelpParams>(args)?;
        }
        Ok(Prepared::Immediate(CallToolResult::success(vec![Content::text(self.render()?)])))
    }
}
