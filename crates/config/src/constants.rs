//! Centralized constants for the factor update workspace.
//!
//! This module contains default values used across crates to avoid
//! magic value duplication and improve maintainability.

// =============================================================================
// Environment Overrides
// =============================================================================

/// Default prefix for environment variable overrides
/// (`database.host` -> `FACTOR_UPDATE_DATABASE_HOST`).
pub const DEFAULT_ENV_PREFIX: &str = "FACTOR_UPDATE_";

// =============================================================================
// Configuration Root Discovery
// =============================================================================

/// Relative path whose presence marks a directory as the project root.
pub const ROOT_MARKER: &str = "config/app_config.yaml";

/// Maximum number of ancestor directories searched for the root marker.
pub const MAX_ROOT_SEARCH_LEVELS: usize = 10;

/// Application name used for the platform fallback config location.
pub const APP_DIR_NAME: &str = "factor-update";

// =============================================================================
// Document File Names (relative to the config directory)
// =============================================================================

/// Primary settings document.
pub const APP_CONFIG_FILE: &str = "app_config.yaml";

/// Optional local overlay merged over the primary settings document.
pub const APP_CONFIG_LOCAL_FILE: &str = "app_config.local.yaml";

/// Connection settings document (host/port/credentials plus pool sizing).
pub const DATABASE_CONFIG_FILE: &str = "database.yaml";

/// Per-table write definitions.
pub const TABLES_CONFIG_FILE: &str = "tables/tables.yaml";

/// Directory holding the legacy path-mapping sheet exports.
pub const PATH_TABLE_DIR: &str = "config_path";

/// Sheet export mapping a folder category to its base path.
pub const MAIN_FOLDER_SHEET: &str = "main_folder.csv";

/// Sheet export mapping a logical data-type name to a category, segment,
/// and placement override flags.
pub const SUB_FOLDER_SHEET: &str = "sub_folder.csv";

// =============================================================================
// Fallback Dates
// =============================================================================

/// Default start date when no factor history exists yet.
pub const DEFAULT_FACTOR_FALLBACK_DATE: &str = "2023-06-01";

/// Default start date for the yg factor source.
pub const DEFAULT_YG_FACTOR_FALLBACK_DATE: &str = "2024-07-05";

/// Cutoff date separating old and new jy source layouts.
pub const DEFAULT_JY_OLD_CUTOFF_DATE: &str = "20200531";

// =============================================================================
// Database Defaults
// =============================================================================

/// Default MySQL host.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default MySQL port.
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Default MySQL charset.
pub const DEFAULT_DB_CHARSET: &str = "utf8mb4";

/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Default connection pool overflow allowance.
pub const DEFAULT_POOL_MAX_OVERFLOW: u32 = 10;

/// Default pool checkout timeout in seconds.
pub const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Default connection recycle interval in seconds.
pub const DEFAULT_POOL_RECYCLE_SECS: i64 = 3600;

/// Key prefixes served by the connection-settings document before the
/// general document is consulted.
pub const DATABASE_DOCUMENT_PREFIXES: &[&str] = &["database.", "connection_pool."];
