use anyhow::Result;
use common::ErrorResponse;
use reqwest::blocking::Response;

/// Pass successful responses through; turn error responses into an error
/// carrying the server's `{"error": ...}` message when it sent one.
pub fn check(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    anyhow::bail!("{} failed: {} - {}", action, status, message)
}
