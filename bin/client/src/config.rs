//! Server URL and token resolution

use crate::constants::{DEFAULT_ROUTE_PREFIX, DELETE_SEGMENT, RENDER_SEGMENT};
use anyhow::Result;

/// Base URL of the file routes on `server`
pub fn api_base(server: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), DEFAULT_ROUTE_PREFIX)
}

/// Accept either a full render URL (used as-is) or a bare token
pub fn render_url(server: &str, target: &str) -> String {
    let target = target.trim();
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("{}{}{}", api_base(server), RENDER_SEGMENT, target)
    }
}

/// The delete URL for the same token as a render URL or bare token
pub fn delete_url(server: &str, target: &str) -> Result<String> {
    let render = render_url(server, target);
    let Some(at) = render.rfind(RENDER_SEGMENT) else {
        anyhow::bail!("Not a render URL: {}", render);
    };
    Ok(format!(
        "{}{}{}",
        &render[..at],
        DELETE_SEGMENT,
        &render[at + RENDER_SEGMENT.len()..]
    ))
}
