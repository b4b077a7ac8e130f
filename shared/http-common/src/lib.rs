//! Shared HTTP utilities for the repository likes workspace.
//!
//! Framework-agnostic error bodies and the client-facing messages the
//! api-server returns.

// ============================================================================
// Error Messages
// ============================================================================

/// Path id is not a well-formed identifier.
pub const INVALID_REPOSITORY_ID: &str = "Invalid repository ID.";

/// Path id is well-formed but no record has it.
pub const REPOSITORY_NOT_FOUND: &str = "Repository not found";

/// Request body is present but is not valid JSON for the route.
pub const INVALID_REQUEST_BODY: &str = "Invalid request body.";

pub const INTERNAL_ERROR: &str = "Internal server error";

// ============================================================================
// JSON Response Helpers
// ============================================================================

/// Create an error JSON body.
///
/// Returns: `{"error": "<message>"}`
pub fn json_error(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
