//! Client code for mcp-quickchart.
//!
//! This crate resolves QuickChart endpoints and performs the render calls
//! behind the [`RenderBackend`] trait used by the server.

pub mod endpoints;
pub mod fetch;

pub use endpoints::{Endpoint, Endpoints};
pub use fetch::{
    FetchConfig, Format, Method, QuickChartClient, RenderBackend, RenderRequest, RenderedBody, display_url, query_pairs,
    with_fragment, with_path_segment, with_query,
};
