use crate::config::delete_url;
use crate::response;
use anyhow::{Context, Result};
use common::DeleteResponse;
use log::info;
use reqwest::blocking::Client;

/// Delete the file behind a render URL or bare token
pub fn delete_file(server: &str, target: &str) -> Result<()> {
    let url = delete_url(server, target)?;
    info!("Deleting {}", url);

    let response = Client::new()
        .delete(&url)
        .send()
        .context("Failed to connect to server")?;
    let result: DeleteResponse = response::check(response, "Delete")?
        .json()
        .context("Unexpected delete response")?;

    println!("{}", result.message);
    Ok(())
}
