//! Unified error types for mcp-quickchart.
//!
//! Every failure collapses onto one of three JSON-RPC codes at the protocol
//! boundary: invalid params, method not found, or internal error.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the mcp-quickchart server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller arguments failed type, range, enum or structural checks.
    #[error("INVALID_PARAMS: {0}")]
    InvalidParams(String),

    /// Unknown or disabled tool name.
    #[error("METHOD_NOT_FOUND: {0}")]
    MethodNotFound(String),

    /// QuickChart answered with a non-2xx status.
    #[error("HTTP_ERROR: status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Transport failure before a status was received.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Writing the rendered output to disk failed.
    #[error("SAVE_FAILED: {0}")]
    SaveFailed(String),

    /// A payload could not be encoded into a request.
    #[error("ENCODE_FAILED: {0}")]
    Encode(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParams`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParams(msg.into())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidParams(msg) => (ErrorCode::INVALID_PARAMS, msg.clone()),
            Error::MethodNotFound(name) => (ErrorCode::METHOD_NOT_FOUND, format!("Unknown tool: {name}")),
            Error::HttpStatus { status, url } => (
                ErrorCode::INTERNAL_ERROR,
                format!("Failed to fetch content from QuickChart - Status: {status} ({url})"),
            ),
            Error::Network(msg) => (
                ErrorCode::INTERNAL_ERROR,
                format!("Failed to fetch content from QuickChart - {msg}"),
            ),
            Error::FetchTimeout(msg) => (ErrorCode::INTERNAL_ERROR, format!("Request to QuickChart timed out: {msg}")),
            Error::SaveFailed(msg) => (ErrorCode::INTERNAL_ERROR, msg.clone()),
            Error::Encode(msg) => (ErrorCode::INTERNAL_ERROR, msg.clone()),
        };

        McpError { code, message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HttpStatus { status: 502, url: "https://quickchart.io/chart".into() };
        assert!(err.to_string().contains("HTTP_ERROR"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_invalid_params_code() {
        let mcp_err: McpError = Error::invalid("width must be between 1 and 10000").into();
        assert_eq!(mcp_err.code.0, -32602);
        assert_eq!(mcp_err.message, "width must be between 1 and 10000");
    }

    #[test]
    fn test_method_not_found_code() {
        let mcp_err: McpError = Error::MethodNotFound("create-pie".into()).into();
        assert_eq!(mcp_err.code.0, -32601);
        assert!(mcp_err.message.contains("create-pie"));
    }

    #[test]
    fn test_downstream_errors_are_internal() {
        let errs = [
            Error::HttpStatus { status: 500, url: "https://quickchart.io/qr".into() },
            Error::Network("connection refused".into()),
            Error::FetchTimeout("30000ms".into()),
            Error::SaveFailed("disk full".into()),
            Error::Encode("bad json".into()),
        ];
        for err in errs {
            let mcp_err: McpError = err.into();
            assert_eq!(mcp_err.code.0, -32603);
        }
    }

    #[test]
    fn test_http_status_message_carries_status() {
        let mcp_err: McpError = Error::HttpStatus { status: 500, url: "https://quickchart.io/qr".into() }.into();
        assert!(mcp_err.message.contains("500"));
    }
}
