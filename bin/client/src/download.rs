use crate::config::render_url;
use crate::constants::FALLBACK_DOWNLOAD_NAME;
use crate::response;
use anyhow::{Context, Result};
use common::file_utils::sanitize_filename;
use log::info;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_DISPOSITION;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Download the file behind a render URL or bare token.
///
/// `output` may name a file or an existing directory; without it the file is
/// written to the current directory under the server-provided name.
pub fn download_file(server: &str, target: &str, output: Option<&Path>) -> Result<PathBuf> {
    let url = render_url(server, target);
    info!("Downloading {}", url);

    let mut response = Client::new()
        .get(&url)
        .send()
        .context("Failed to connect to server")?;
    response = response::check(response, "Download")?;

    let filename = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(disposition_filename)
        .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string());

    let path = output_path(output, &filename);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let mut file =
        File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let written = std::io::copy(&mut response, &mut file)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("Saved {} ({} bytes)", path.display(), written);
    Ok(path)
}

fn output_path(output: Option<&Path>, filename: &str) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename),
    }
}

/// Extract a safe filename from a `Content-Disposition` header value
fn disposition_filename(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"').to_string())
    })?;

    let safe = sanitize_filename(&raw);
    (!safe.is_empty()).then_some(safe)
}
