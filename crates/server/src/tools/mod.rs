//! MCP tool implementations.
//!
//! One module per QuickChart backend, plus the help tool.

pub mod apexcharts;
pub mod barcode;
pub mod chart;
pub mod common;
pub mod googlecharts;
pub mod graphviz;
pub mod help;
pub mod qrcode;
pub mod sparkline;
pub mod table;
pub mod textchart;
pub mod validate;
pub mod watermark;
pub mod wordcloud;
