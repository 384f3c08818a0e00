/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: &str = "2424";

/// Default public base URL used when building file links
pub const DEFAULT_BASE_URL: &str = "http://localhost:2424";

/// Default mount point of the file routes
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/bcloud/fileuploader";

/// Storage type identifier for S3-compatible storage (also the default)
pub const STORAGE_TYPE_S3: &str = "s3";

/// Storage type identifier for the in-process store
pub const STORAGE_TYPE_MEMORY: &str = "memory";

pub const DEFAULT_STORAGE_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_STORAGE_ACCESS_KEY: &str = "admin";
pub const DEFAULT_STORAGE_SECRET_KEY: &str = "admin123";
pub const DEFAULT_STORAGE_BUCKET: &str = "fileuploads";
pub const DEFAULT_STORAGE_REGION: &str = "us-east-1";

/// Default bound on a single backend call, in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECONDS: &str = "30";

/// Default cap on a whole multipart request, in megabytes
pub const DEFAULT_MAX_REQUEST_SIZE_MB: &str = "512";

