//! Fields shared by every rendering tool.

use quickchart_client::Format;
use quickchart_core::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do with the rendered asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Return the shareable URL and an inline preview.
    #[default]
    GetUrl,
    /// Additionally write the asset to `outputPath`.
    SaveFile,
}

/// Output format of the backends that default to SVG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VectorFormat {
    #[default]
    Svg,
    Png,
}

impl VectorFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            VectorFormat::Svg => "svg",
            VectorFormat::Png => "png",
        }
    }
}

impl From<VectorFormat> for Format {
    fn from(format: VectorFormat) -> Self {
        match format {
            VectorFormat::Svg => Format::Svg,
            VectorFormat::Png => Format::Png,
        }
    }
}

/// Access to the `action` / `outputPath` pair of a parameter struct.
pub trait ActionParams {
    fn action(&self) -> Action;
    fn output_path(&self) -> Option<&str>;

    /// Destination requested by the caller, if the asset should be saved.
    ///
    /// # Errors
    ///
    /// `InvalidParams` naming `outputPath` when `action` is `save_file` and
    /// no non-blank path was given.
    fn save_path(&self) -> Result<Option<String>, Error> {
        match self.action() {
            Action::GetUrl => Ok(None),
            Action::SaveFile => match self.output_path().map(str::trim).filter(|p| !p.is_empty()) {
                Some(path) => Ok(Some(path.to_string())),
                None => Err(Error::invalid("outputPath is required when action is save_file")),
            },
        }
    }
}

/// Implements [`ActionParams`] for structs with `action` and `output_path` fields.
macro_rules! impl_action_params {
    ($($params:ty),+ $(,)?) => {
        $(
            impl $crate::tools::common::ActionParams for $params {
                fn action(&self) -> $crate::tools::common::Action {
                    self.action
                }

                fn output_path(&self) -> Option<&str> {
                    self.output_path.as_deref()
                }
            }
        )+
    };
}

pub(crate) use impl_action_params;
