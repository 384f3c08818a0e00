mod http_checks;
mod test_utils;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use test_utils::*;

const TEST_FILES_COUNT: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("e2e_tests=debug,info")
        .init();

    println!("📦 Running E2E tests against the file uploader gateway...");
    run_gateway_tests().await?;

    println!("\n✅ All E2E tests passed!");

    Ok(())
}

async fn run_gateway_tests() -> Result<()> {
    let server_url =
        std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:2424".to_string());
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(Path::parent)
        .context("e2e crate is not inside the workspace")?
        .to_path_buf();
    let client_binary = std::env::var("CLIENT_BINARY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| workspace_root.join("target").join("release").join("fileuploader"));

    // Create temporary test directories
    let test_data_dir = manifest_dir.join("test_data");
    let test_files_dir = test_data_dir.join("test_files");
    let download_dir = test_data_dir.join("downloaded");

    std::fs::create_dir_all(&test_files_dir)?;
    std::fs::create_dir_all(&download_dir)?;

    println!("Server URL: {}", server_url);
    println!("Client binary: {:?}", client_binary);

    wait_for_server(&server_url).await?;

    let files = create_test_files(&test_files_dir, TEST_FILES_COUNT)?;
    let client = ClientRunner::new(client_binary, &server_url);
    let folder = format!("e2e-tests/run-{}", std::process::id());
    let mut uploaded = Vec::new();

    let test_result = async {
        // Test single upload; the file name contains spaces
        println!("\n📤 Testing upload...");
        let single = &files[TEST_FILES_COUNT - 1];
        let url = client.upload(&folder, single)?;
        uploaded.push(url.clone());
        println!("✅ Uploaded {:?} -> {}", single, url);

        println!("\n🔍 Validating render headers...");
        let (content_type, disposition) = http_checks::render_headers(&url).await?;
        let expected_name = format!("e2e_report_{}.txt", TEST_FILES_COUNT - 1);
        anyhow::ensure!(
            content_type.starts_with("text/plain"),
            "Unexpected Content-Type: {}",
            content_type
        );
        anyhow::ensure!(
            disposition.contains(&expected_name),
            "Unexpected Content-Disposition: {}",
            disposition
        );
        println!("✅ Render headers validation passed");

        println!("\n📥 Testing download...");
        client.download(&url, &download_dir)?;
        assert_same_content(single, &download_dir.join(&expected_name))?;
        println!("✅ Downloaded file validation passed");

        // Test multi upload with the remaining files
        println!("\n📤 Testing multi upload...");
        let batch = &files[..TEST_FILES_COUNT - 1];
        let urls = client.upload_multi(&folder, batch)?;
        anyhow::ensure!(
            urls.len() == batch.len(),
            "Expected {} uploaded files, got {}",
            batch.len(),
            urls.len()
        );
        uploaded.extend(urls.iter().cloned());
        for (file, url) in batch.iter().zip(&urls) {
            client.download(url, &download_dir)?;
            let name = file
                .file_name()
                .context("test file has no name")?;
            assert_same_content(file, &download_dir.join(name))?;
        }
        println!("✅ Multi upload validation passed");

        // Tokens must be tamper-evident
        println!("\n🔍 Validating token integrity...");
        let tampered = http_checks::tamper_url(&url)?;
        let error = http_checks::expect_render_error(&tampered, StatusCode::BAD_REQUEST).await?;
        anyhow::ensure!(error == "Invalid token", "Unexpected error: {}", error);
        println!("✅ Tampered token rejected");

        // Delete, then render must report the file missing
        println!("\n🗑️  Testing delete...");
        client.delete(&url)?;
        uploaded.retain(|u| u != &url);
        let error = http_checks::expect_render_error(&url, StatusCode::NOT_FOUND).await?;
        anyhow::ensure!(error == "File not found", "Unexpected error: {}", error);
        println!("✅ Delete validation passed");

        Ok::<(), anyhow::Error>(())
    }
    .await;

    // Always cleanup, even on error
    cleanup_uploaded(&client, &uploaded);
    if let Err(e) = cleanup_test_data(&test_data_dir) {
        eprintln!("Warning: Failed to cleanup test data: {}", e);
    }

    test_result
}

fn keep_test_data() -> bool {
    std::env::var("KEEP_TEST_DATA").unwrap_or_else(|_| "false".to_string()) == "true"
}

fn cleanup_uploaded(client: &ClientRunner, urls: &[String]) {
    if keep_test_data() {
        println!(
            "\n⚠️  Keeping {} uploaded files (KEEP_TEST_DATA=true)",
            urls.len()
        );
        return;
    }

    for url in urls {
        if let Err(e) = client.delete(url) {
            eprintln!("Warning: Failed to delete {}: {}", url, e);
        }
    }
}

fn cleanup_test_data(test_data_dir: &Path) -> Result<()> {
    if keep_test_data() {
        println!(
            "\n⚠️  Keeping test data (KEEP_TEST_DATA=true): {:?}",
            test_data_dir
        );
        return Ok(());
    }

    println!("\n🧹 Cleaning up test data: {:?}", test_data_dir);
    if test_data_dir.exists() {
        std::fs::remove_dir_all(test_data_dir).with_context(|| {
            format!("Failed to remove test data directory: {:?}", test_data_dir)
        })?;
        println!("✅ Test data cleaned up");
    }
    Ok(())
}
