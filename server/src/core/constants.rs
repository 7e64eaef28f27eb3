// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Nestmate";

/// Application name in lowercase (for log targets and identifiers)
pub const APP_NAME_LOWER: &str = "nestmate";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "nestmate.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "NESTMATE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "NESTMATE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "NESTMATE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "NESTMATE_LOG";

/// Environment variable for log output format (`compact` or `json`)
pub const ENV_LOG_FORMAT: &str = "NESTMATE_LOG_FORMAT";

// =============================================================================
// Environment Variables - Database & Auth
// =============================================================================

/// Environment variable for the SQLite connection URL
pub const ENV_DATABASE_URL: &str = "NESTMATE_DATABASE_URL";

/// Environment variable for the user token signing secret
pub const ENV_JWT_SECRET: &str = "NESTMATE_JWT_SECRET";

/// Environment variable for the admin token signing secret
pub const ENV_ADMIN_JWT_SECRET: &str = "NESTMATE_ADMIN_JWT_SECRET";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 4100;

/// Route prefix of the versioned API
pub const API_PREFIX: &str = "/api/v1";

/// Per-request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Time allowed for in-flight requests to drain on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// SQLite
// =============================================================================

/// Default database URL (file in the working directory)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://nestmate.db";

/// Default pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Default busy timeout in milliseconds
pub const DEFAULT_DB_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Pool acquire timeout
pub const SQLITE_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages written before SQLite checkpoints the WAL on its own
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval of the background WAL checkpoint task
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Auth
// =============================================================================

/// Lifetime of tokens minted by `nestmate token`
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Shortest accepted signing secret
pub const MIN_JWT_SECRET_LEN: usize = 16;

// =============================================================================
// Pagination
// =============================================================================

/// Page size used when the request gives none
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard upper bound on page size
pub const MAX_PAGE_SIZE: u32 = 50;
