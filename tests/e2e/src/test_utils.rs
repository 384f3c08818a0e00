use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;
use tokio::time::sleep;

const HEALTH_ATTEMPTS: u32 = 30;
const HEALTH_INTERVAL: Duration = Duration::from_secs(1);

/// Write `count` small text files and return their paths.
/// The last name contains a space so sanitization is exercised end to end.
pub fn create_test_files(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    (0..count)
        .map(|i| {
            let filename = if i + 1 == count {
                format!("e2e report {}.txt", i)
            } else {
                format!("file{}.txt", i)
            };
            let content = format!("Test file {} content\n", i);
            let file_path = dir.join(&filename);
            fs::write(&file_path, content)
                .with_context(|| format!("Failed to create test file: {:?}", file_path))?;
            Ok(file_path)
        })
        .collect()
}

pub async fn wait_for_server(url: &str) -> Result<()> {
    poll_health(url, HEALTH_ATTEMPTS, HEALTH_INTERVAL).await
}

/// Poll `/health`, pausing `interval` after every unsuccessful attempt
async fn poll_health(url: &str, attempts: u32, interval: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", url);

    println!("Waiting for server to be ready...");
    for attempt in 1..=attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                println!("Server is ready!");
                return Ok(());
            }
            Ok(response) => println!("Health check returned {}", response.status()),
            Err(_) => {}
        }
        if attempt < attempts {
            sleep(interval).await;
        }
    }

    anyhow::bail!("Server did not become ready after {} attempts", attempts);
}

/// Runs the client binary against one server
pub struct ClientRunner {
    binary: PathBuf,
    server_url: String,
}

impl ClientRunner {
    pub fn new(binary: PathBuf, server_url: &str) -> Self {
        Self {
            binary,
            server_url: server_url.to_string(),
        }
    }

    fn run(&self, action: &str, args: &[&OsStr]) -> Result<Output> {
        let output = Command::new(&self.binary)
            .args(args)
            .arg("--server")
            .arg(&self.server_url)
            .output()
            .with_context(|| format!("Failed to run client binary: {:?}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            anyhow::bail!("{} failed:\nSTDOUT: {}\nSTDERR: {}", action, stdout, stderr);
        }

        Ok(output)
    }

    /// Upload one file and return its render URL
    pub fn upload(&self, folder: &str, file: &Path) -> Result<String> {
        let output = self.run(
            "Upload",
            &[OsStr::new("upload"), OsStr::new("--folder"), OsStr::new(folder), file.as_os_str()],
        )?;
        parse_urls(&output.stdout)
            .into_iter()
            .next()
            .context("Upload printed no URL")
    }

    /// Upload several files in one request and return their render URLs
    pub fn upload_multi(&self, folder: &str, files: &[PathBuf]) -> Result<Vec<String>> {
        let mut args: Vec<&OsStr> =
            vec![OsStr::new("upload-multi"), OsStr::new("--folder"), OsStr::new(folder)];
        args.extend(files.iter().map(|f| f.as_os_str()));
        let output = self.run("Upload multi", &args)?;
        Ok(parse_urls(&output.stdout))
    }

    pub fn download(&self, url: &str, output_dir: &Path) -> Result<()> {
        self.run(
            "Download",
            &[
                OsStr::new("download"),
                OsStr::new(url),
                OsStr::new("--output"),
                output_dir.as_os_str(),
            ],
        )?;
        Ok(())
    }

    pub fn delete(&self, url: &str) -> Result<()> {
        self.run("Delete", &[OsStr::new("delete"), OsStr::new(url)])?;
        Ok(())
    }
}

/// Collect every `URL: <url>` value the client printed
fn parse_urls(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.rsplit_once("URL: "))
        .map(|(_, url)| url.trim().to_string())
        .collect()
}

pub fn assert_same_content(original: &Path, downloaded: &Path) -> Result<()> {
    let expected =
        fs::read(original).with_context(|| format!("Failed to read {:?}", original))?;
    let actual =
        fs::read(downloaded).with_context(|| format!("Failed to read {:?}", downloaded))?;
    anyhow::ensure!(
        expected == actual,
        "Downloaded file {:?} differs from {:?}",
        downloaded,
        original
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer every connection with `503 Service Unavailable`
    async fn unhealthy_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unhealthy_responses_are_retried_with_pauses() {
        let url = unhealthy_server().await;
        let started = Instant::now();

        let result = poll_health(&url, 3, Duration::from_millis(200)).await;

        assert!(result.is_err());
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[test]
    fn test_parse_urls() {
        let stdout = b"URL: http://h/render/a\nb.txt URL: http://h/render/b\nb.txt FAILED: denied\n";
        assert_eq!(parse_urls(stdout), ["http://h/render/a", "http://h/render/b"]);
    }
}
