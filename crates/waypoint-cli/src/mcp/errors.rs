//! Error handling utilities for MCP server

use rmcp::ErrorData;
use waypoint_core::PlannerError;

/// Convert a planner error into an MCP error.
///
/// Bad input, unknown IDs and rejected transitions are reported as invalid
/// parameters so the client can correct the call; storage and configuration
/// failures are internal errors.
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_recoverable() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}
