use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::ErrorResponse;
use reqwest::StatusCode;

/// Flip one bit in the middle of a render URL's token
pub fn tamper_url(url: &str) -> Result<String> {
    let (base, token) = url.rsplit_once('/').context("URL has no token")?;
    let mut raw = URL_SAFE_NO_PAD
        .decode(token)
        .context("Token is not URL-safe base64")?;
    let middle = raw.len() / 2;
    raw[middle] ^= 0x01;
    Ok(format!("{}/{}", base, URL_SAFE_NO_PAD.encode(raw)))
}

/// GET `url` and require `expected` along with a JSON error body
pub async fn expect_render_error(url: &str, expected: StatusCode) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to GET {}", url))?;
    let status = response.status();
    anyhow::ensure!(
        status == expected,
        "Expected {} from {}, got {}",
        expected,
        url,
        status
    );
    let body: ErrorResponse = response
        .json()
        .await
        .context("Error response is not JSON")?;
    Ok(body.error)
}

/// GET `url` and return the response headers relevant to inline rendering
pub async fn render_headers(url: &str) -> Result<(String, String)> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to GET {}", url))?;
    anyhow::ensure!(
        response.status().is_success(),
        "Render failed: {}",
        response.status()
    );
    let header = |name: reqwest::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    Ok((
        header(reqwest::header::CONTENT_TYPE),
        header(reqwest::header::CONTENT_DISPOSITION),
    ))
}
