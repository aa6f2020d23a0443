//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Placeholders substituted for missing upstream fields
pub const UNKNOWN: &str = "Unknown";
pub const NO_MEMO: &str = "No memo";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_PROGRAM: &str = "No Program";
pub const NOT_APPLICABLE: &str = "N/A";
pub const DEFAULT_CURRENCY: &str = "USD";

// Filter sentinel for single-select "everything"
pub const FILTER_ALL: &str = "all";

// Accounting
pub const GL_ACCOUNT_REMOTE_TYPE: &str = "GL_ACCOUNT";
pub const DEPARTMENT_FIELD_NAME: &str = "Department";

// Aggregates
pub const TOP_DEPARTMENTS: usize = 10;

// Cache
pub const CACHE_SCHEMA_VERSION: &str = "2";
pub const CACHE_MAX_AGE_HOURS: i64 = 24;
pub const CACHE_CLOCK_SKEW_SECS: i64 = 60;

// Session & OAuth
pub const SESSION_COOKIE_NAME: &str = "session_token";
pub const SESSION_TTL_SECS: i64 = 8 * 60 * 60;
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 10 * 60;
pub const OAUTH_SCOPES: &str = "openid email profile";
pub const DEFAULT_ALLOWED_EMAIL_DOMAIN: &str = "coder.com";

// Provider fetching
pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 20;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_FETCH_ATTEMPTS: usize = 3;
