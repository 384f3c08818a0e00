/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:2424";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "FILEUPLOADER_SERVER";

/// Route prefix the server mounts file routes under by default
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/bcloud/fileuploader";

/// Upload endpoint path
pub const UPLOAD_ENDPOINT: &str = "/upload";

/// Multi-file upload endpoint path
pub const UPLOAD_MULTI_ENDPOINT: &str = "/upload_multi";

/// Path segment preceding a token in render URLs
pub const RENDER_SEGMENT: &str = "/render/";

/// Path segment preceding a token in delete URLs
pub const DELETE_SEGMENT: &str = "/delete/";

/// Output filename when the server does not name the file
pub const FALLBACK_DOWNLOAD_NAME: &str = "download";
