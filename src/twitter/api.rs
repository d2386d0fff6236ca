//! Core Twitter API utilities.
//!
//! This module contains low-level helpers for making authenticated requests
//! to the Twitter API and for logging untrusted response text safely.

use log::{debug, error, info};

use crate::error::{Error, Result};

/// Twitter API v2 base URL.
pub(crate) const API_BASE: &str = "https://api.x.com/2";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// Builds the Authorization header for OAuth 2.0 User Context authentication.
///
/// # Format
///
/// ```text
/// Bearer YOUR_ACCESS_TOKEN_HERE
/// ```
pub fn build_oauth2_user_context_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Sends a prepared request to the Twitter API and returns the response body.
///
/// # Parameters
///
/// - `request_builder`: A configured request, including its Authorization header
/// - `operation_name`: Human-readable name for the operation (for logging)
///
/// # Returns
///
/// - `Ok(String)`: The API response body on success
/// - `Err(Error::TwitterApi)`: If the API answers with a non-success status
pub(crate) async fn send_authenticated_request(
    request_builder: reqwest::RequestBuilder,
    operation_name: &str,
) -> Result<String> {
    info!(
        "Making authenticated request for operation: {}",
        operation_name
    );

    let response = request_builder.send().await?;
    let status = response.status();
    info!(
        "Received response with status: {} for operation: {}",
        status, operation_name
    );

    let response_text = response.text().await?;
    if status.is_success() {
        info!("Operation '{}' completed successfully", operation_name);
        debug!(
            "Response summary for '{}': {} bytes received",
            operation_name,
            response_text.len()
        );
        return Ok(response_text);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        error!(
            "Received 401 Unauthorized for operation '{}' - access token may be expired",
            operation_name
        );
    } else {
        error!("Operation '{}' failed - Status: {}", operation_name, status);
    }
    debug!(
        "Error response for '{}': {}",
        operation_name,
        sanitize_for_logging(&response_text, 200)
    );

    Err(Error::TwitterApi {
        operation: operation_name.to_string(),
        status: status.as_u16(),
    })
}
