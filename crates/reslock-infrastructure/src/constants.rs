//! Infrastructure layer constants
//!
//! Lock and throttling defaults live in `reslock_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "reslock.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "reslock";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "RESLOCK";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "RESLOCK_LOG";

/// File name stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "reslock";

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Storage backend used when none is configured
pub const DEFAULT_STORAGE_PROVIDER: &str = "memory";

/// Buffer capacity of the in-process event bus
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1024;

/// Client name announced to NATS servers
pub const DEFAULT_NATS_CLIENT_NAME: &str = "reslock";
