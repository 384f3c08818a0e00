use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_SECONDS, DEFAULT_BASE_URL, DEFAULT_HOST, DEFAULT_MAX_REQUEST_SIZE_MB,
    DEFAULT_PORT, DEFAULT_ROUTE_PREFIX, DEFAULT_STORAGE_ACCESS_KEY, DEFAULT_STORAGE_BUCKET,
    DEFAULT_STORAGE_ENDPOINT, DEFAULT_STORAGE_REGION, DEFAULT_STORAGE_SECRET_KEY,
    STORAGE_TYPE_MEMORY, STORAGE_TYPE_S3,
};
use clap::{Arg, ArgMatches, Command};
use std::ffi::OsString;
use std::str::FromStr;
use std::time::Duration;
use storage::{S3Config, StorageBackend};

/// Server configuration.
/// Every value resolves as command-line flag > environment variable > default.
#[derive(Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Worker count; `None` keeps the actix default
    pub workers: Option<usize>,
    /// Public base URL prepended to generated file links
    pub base_url: String,
    /// Mount point of the file routes, e.g. `/api/bcloud/fileuploader`
    pub route_prefix: String,
    /// Storage backend type
    pub storage_type: StorageType,
    /// Connection settings used when `storage_type` is S3
    pub s3: S3Config,
    /// Token signing secret; required to start serving
    pub encryption_key: Option<String>,
    /// Bound on every backend call
    pub backend_timeout: Duration,
    /// Cap on a whole multipart request body
    pub max_request_bytes: usize,
}

/// Storage backend type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    S3,
    Memory,
}

impl ServerConfig {
    /// Parse the process arguments; `--help` and usage errors exit here
    pub fn load() -> Result<Self, std::io::Error> {
        Self::from_matches(&command().get_matches())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, std::io::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command()
            .try_get_matches_from(args)
            .map_err(|e| invalid_input(e.to_string()))?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, std::io::Error> {
        let storage_type_str = string_arg(matches, "storage");
        let storage_type = match storage_type_str.as_str() {
            STORAGE_TYPE_S3 => StorageType::S3,
            STORAGE_TYPE_MEMORY => StorageType::Memory,
            _ => {
                return Err(invalid_input(format!(
                    "Invalid storage type: {}. Must be '{}' or '{}'",
                    storage_type_str, STORAGE_TYPE_S3, STORAGE_TYPE_MEMORY
                )));
            }
        };

        let endpoint = string_arg(matches, "storage-endpoint");
        let s3 = S3Config {
            endpoint: (!endpoint.trim().is_empty()).then_some(endpoint),
            region: string_arg(matches, "region"),
            bucket: string_arg(matches, "bucket"),
            access_key: string_arg(matches, "storage-access-key"),
            secret_key: string_arg(matches, "storage-secret-key"),
        };

        let workers = matches
            .get_one::<String>("workers")
            .map(|raw| parse_number::<usize>("workers", raw))
            .transpose()?;

        let timeout_seconds: u64 = parse_number(
            "backend-timeout",
            &string_arg(matches, "backend-timeout"),
        )?;
        if timeout_seconds == 0 {
            return Err(invalid_input(
                "Backend timeout must be at least 1 second".to_string(),
            ));
        }

        let max_request_mb: usize =
            parse_number("max-request-size", &string_arg(matches, "max-request-size"))?;

        Ok(ServerConfig {
            host: string_arg(matches, "host"),
            port: parse_number("port", &string_arg(matches, "port"))?,
            workers,
            base_url: normalize_base_url(&string_arg(matches, "base-url")),
            route_prefix: normalize_route_prefix(&string_arg(matches, "route-prefix")),
            storage_type,
            s3,
            encryption_key: matches.get_one::<String>("encryption-key").cloned(),
            backend_timeout: Duration::from_secs(timeout_seconds),
            max_request_bytes: max_request_mb.saturating_mul(1024 * 1024),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        match self.storage_type {
            StorageType::S3 => StorageBackend::S3(self.s3.clone()),
            StorageType::Memory => StorageBackend::Memory,
        }
    }
}

fn command() -> Command {
    Command::new("fileuploader-server")
        .about("Tokenized upload/download gateway for S3-compatible storage")
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .env("SERVER_HOST")
                .default_value(DEFAULT_HOST)
                .help("Server host"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .env("SERVER_PORT")
                .default_value(DEFAULT_PORT)
                .help("Server port"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .value_name("COUNT")
                .env("SERVER_WORKERS")
                .help("Number of HTTP workers (default: number of CPUs)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .env("BASE_URL")
                .default_value(DEFAULT_BASE_URL)
                .help("Public base URL used in generated file links"),
        )
        .arg(
            Arg::new("route-prefix")
                .long("route-prefix")
                .value_name("PATH")
                .env("ROUTE_PREFIX")
                .default_value(DEFAULT_ROUTE_PREFIX)
                .help("Path prefix the file routes are mounted under"),
        )
        .arg(
            Arg::new("storage")
                .long("storage")
                .value_name("TYPE")
                .env("STORAGE_TYPE")
                .default_value(STORAGE_TYPE_S3)
                .help("Storage backend type: 's3' or 'memory'"),
        )
        .arg(
            Arg::new("storage-endpoint")
                .long("storage-endpoint")
                .value_name("URL")
                .env("STORAGE_ENDPOINT")
                .default_value(DEFAULT_STORAGE_ENDPOINT)
                .help("S3-compatible endpoint (empty string for AWS)"),
        )
        .arg(
            Arg::new("storage-access-key")
                .long("storage-access-key")
                .value_name("KEY")
                .env("STORAGE_ACCESS_KEY")
                .hide_env_values(true)
                .default_value(DEFAULT_STORAGE_ACCESS_KEY)
                .help("S3 access key"),
        )
        .arg(
            Arg::new("storage-secret-key")
                .long("storage-secret-key")
                .value_name("KEY")
                .env("STORAGE_SECRET_KEY")
                .hide_env_values(true)
                .hide_default_value(true)
                .default_value(DEFAULT_STORAGE_SECRET_KEY)
                .help("S3 secret key"),
        )
        .arg(
            Arg::new("bucket")
                .long("bucket")
                .value_name("NAME")
                .env("STORAGE_BUCKET")
                .default_value(DEFAULT_STORAGE_BUCKET)
                .help("Bucket holding uploaded files"),
        )
        .arg(
            Arg::new("region")
                .long("region")
                .value_name("REGION")
                .env("STORAGE_REGION")
                .default_value(DEFAULT_STORAGE_REGION)
                .help("S3 region"),
        )
        .arg(
            Arg::new("encryption-key")
                .long("encryption-key")
                .value_name("SECRET")
                .env("ENCRYPTION_KEY")
                .hide_env_values(true)
                .help("Secret used to issue and verify file tokens (required)"),
        )
        .arg(
            Arg::new("backend-timeout")
                .long("backend-timeout")
                .value_name("SECONDS")
                .env("BACKEND_TIMEOUT_SECONDS")
                .default_value(DEFAULT_BACKEND_TIMEOUT_SECONDS)
                .help("Timeout applied to each storage call"),
        )
        .arg(
            Arg::new("max-request-size")
                .long("max-request-size")
                .value_name("MB")
                .env("MAX_REQUEST_SIZE_MB")
                .default_value(DEFAULT_MAX_REQUEST_SIZE_MB)
                .help("Largest accepted multipart request, in megabytes"),
        )
}

fn string_arg(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, std::io::Error> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_input(format!("Invalid value for {}: {}", name, raw)))
}

fn invalid_input(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

/// Leading `/` enforced, trailing `/` removed; `/` alone mounts at the root
pub fn normalize_route_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
