//! Layered configuration resolver.
//!
//! Responsibilities:
//! - Discover the configuration root and load every layered source: the
//!   general document (plus its optional local overlay), the connection
//!   settings document, the table definitions, and the legacy path table.
//! - Expose dotted-key lookup with defined precedence: environment
//!   override, then the connection-settings document for `database.` /
//!   `connection_pool.` keys, then the general document.
//! - Expose derived projections (source priorities, index aliases, factor
//!   lists, fallback dates, critical times, database settings) and a
//!   wholesale `reload`.
//!
//! Does NOT handle:
//! - Persisting configuration changes back to disk.
//! - Date arithmetic or any pipeline business logic.
//!
//! Invariants:
//! - A missing or unparsable optional document degrades to an empty
//!   document with one log line; lookups fall through to the next source
//!   or the caller's default.
//! - Readers never observe a half-replaced document set: `reload` swaps a
//!   fully built snapshot under the single writer lock.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::NaiveTime;
use tracing::{debug, warn};

use crate::constants::{
    APP_CONFIG_FILE, APP_CONFIG_LOCAL_FILE, DATABASE_CONFIG_FILE, DATABASE_DOCUMENT_PREFIXES,
    DEFAULT_ENV_PREFIX, MAX_ROOT_SEARCH_LEVELS, ROOT_MARKER, TABLES_CONFIG_FILE,
};
use crate::discover::{fallback_config_dir, find_root};
use crate::env::env_override;
use crate::error::ConfigError;
use crate::paths::PathTable;
use crate::projections::{
    ConnectionPoolSettings, DataSource, DatabaseSettings, FallbackDateKind, IndexMappingKind,
};
use crate::store::ConfigStore;
use crate::value::Value;

/// Builder for [`ConfigResolver`].
#[derive(Debug, Default)]
pub struct ConfigResolverBuilder {
    root: Option<PathBuf>,
    start_dir: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `root` as the project root, skipping ancestor discovery.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Start ancestor discovery from `dir` instead of the process working
    /// directory.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Override the environment variable prefix (default `FACTOR_UPDATE_`).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> Result<ConfigResolver, ConfigError> {
        let start_dir = match self.start_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let snapshot = Snapshot::load(self.root.as_deref(), &start_dir)?;
        Ok(ConfigResolver {
            env_prefix: self.env_prefix.unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string()),
            root_override: self.root,
            start_dir,
            inner: RwLock::new(snapshot),
        })
    }
}

/// One fully loaded document set. Replaced wholesale on `reload`.
#[derive(Debug)]
struct Snapshot {
    project_root: PathBuf,
    config_dir: PathBuf,
    general: ConfigStore,
    database: Value,
    tables: Value,
    paths: PathTable,
}

impl Snapshot {
    fn load(root_override: Option<&Path>, start_dir: &Path) -> Result<Self, ConfigError> {
        let (project_root, config_dir) = match root_override {
            Some(root) => (root.to_path_buf(), root.join("config")),
            None => match find_root(start_dir, Path::new(ROOT_MARKER), MAX_ROOT_SEARCH_LEVELS) {
                Some(root) => {
                    let config_dir = root.join("config");
                    (root, config_dir)
                }
                None => {
                    let config_dir = fallback_config_dir().ok_or_else(|| {
                        ConfigError::RootUnavailable(
                            "no ancestor directory carries the config marker and the platform \
                             config location could not be determined"
                                .to_string(),
                        )
                    })?;
                    debug!(config_dir = %config_dir.display(), "using platform fallback config location");
                    let project_root = config_dir
                        .parent()
                        .map_or_else(|| config_dir.clone(), Path::to_path_buf);
                    (project_root, config_dir)
                }
            },
        };

        let general = ConfigStore::from_documents(
            [
                load_yaml(&config_dir.join(APP_CONFIG_FILE)),
                load_yaml(&config_dir.join(APP_CONFIG_LOCAL_FILE)),
            ]
            .into_iter()
            .flatten(),
        );
        let database = load_yaml(&config_dir.join(DATABASE_CONFIG_FILE)).unwrap_or_else(Value::empty_mapping);
        let tables = load_yaml(&config_dir.join(TABLES_CONFIG_FILE)).unwrap_or_else(Value::empty_mapping);
        let paths = PathTable::load(&config_dir, &project_root);

        Ok(Self {
            project_root,
            config_dir,
            general,
            database,
            tables,
            paths,
        })
    }
}

/// Read one optional YAML document; `None` when absent or unparsable.
fn load_yaml(path: &Path) -> Option<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "optional configuration document not present");
        return None;
    }
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to read configuration document; treating as empty");
            return None;
        }
    };
    match serde_yaml::from_str::<serde_yaml::Value>(&text) {
        Ok(raw) => Some(Value::from(raw)),
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to parse configuration document; treating as empty");
            None
        }
    }
}

/// Single point of truth for settings, resolved paths, and derived domain
/// lookups.
///
/// Construct one per process at the composition root and share it by
/// reference; there is no hidden global.
#[derive(Debug)]
pub struct ConfigResolver {
    env_prefix: String,
    root_override: Option<PathBuf>,
    start_dir: PathBuf,
    inner: RwLock<Snapshot>,
}

impl ConfigResolver {
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// Discover the configuration root from the process working directory
    /// and load every source.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Load with an explicit project root (tests, `--config-root`).
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::builder().with_root(root).build()
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key` (dot-separated) with override precedence: environment
    /// variable, connection-settings document (for `database.` and
    /// `connection_pool.` keys), then the general document.
    ///
    /// Returns `None` when unresolved at every stage; never errors.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = env_override(&self.env_prefix, key) {
            return Some(value);
        }
        let snap = self.snapshot();
        if DATABASE_DOCUMENT_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
        {
            if let Some(value) = snap.database.pointer(key) {
                return Some(value.clone());
            }
        }
        snap.general.get(key).cloned()
    }

    /// [`Self::get`] with a caller-supplied default. A stored null is
    /// returned as-is; only a fully unresolved key yields the default.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    /// Resolve a logical path name via the legacy path table.
    ///
    /// `Ok(None)` is the "not found" sentinel; an ambiguous row surfaces
    /// [`ConfigError::AmbiguousPlacement`].
    pub fn resolve_path(&self, logical_name: &str) -> Result<Option<PathBuf>, ConfigError> {
        self.snapshot().paths.resolve(logical_name)
    }

    /// Logical names known to the path table, in sorted order.
    pub fn logical_path_names(&self) -> Vec<String> {
        self.snapshot()
            .paths
            .logical_names()
            .map(str::to_string)
            .collect()
    }

    /// Source records for `category`, sorted ascending by rank; entries
    /// without a rank sort last, stable among themselves.
    pub fn data_source_priority(&self, category: &str) -> Vec<DataSource> {
        let snap = self.snapshot();
        let Some(sources) = snap
            .general
            .get("data_source_priority")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(category))
            .and_then(Value::as_sequence)
        else {
            return Vec::new();
        };

        let mut entries: Vec<DataSource> = sources
            .iter()
            .filter_map(|entry| {
                match serde_json::from_value(serde_json::Value::from(entry)) {
                    Ok(source) => Some(source),
                    Err(error) => {
                        warn!(%category, %error, "skipping malformed data source entry");
                        None
                    }
                }
            })
            .collect();
        entries.sort_by_key(|source| source.rank.unwrap_or(u32::MAX));
        entries
    }

    /// Source names for `category` in priority order.
    pub fn source_names_ordered(&self, category: &str) -> Vec<String> {
        self.data_source_priority(category)
            .into_iter()
            .map(|source| source.source_name)
            .collect()
    }

    /// The machine-readable alias for an index display name, if mapped.
    pub fn index_mapping(&self, display_name: &str, kind: IndexMappingKind) -> Option<String> {
        let snap = self.snapshot();
        snap.general
            .get("index_mapping")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(kind.config_key()))
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(display_name))
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// The full alias table for `kind`.
    pub fn all_index_mappings(&self, kind: IndexMappingKind) -> Vec<(String, String)> {
        let snap = self.snapshot();
        snap.general
            .get("index_mapping")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(kind.config_key()))
            .and_then(Value::as_mapping)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index display names the pipeline supports.
    pub fn supported_indices(&self) -> Vec<String> {
        self.string_list("index_mapping.supported_indices")
    }

    /// A named time-of-day threshold (`time_1`, `time_2`, ...).
    pub fn critical_time(&self, time_key: &str) -> Option<NaiveTime> {
        let raw = self.critical_time_raw(time_key)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .ok()
    }

    /// The named threshold in `HH:MM` form, or an empty string if unset.
    pub fn critical_time_str(&self, time_key: &str) -> String {
        self.critical_time(time_key)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    }

    fn critical_time_raw(&self, time_key: &str) -> Option<String> {
        let snap = self.snapshot();
        snap.general
            .get("time_tools.critical_time")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(time_key))
            .and_then(|v| v.pointer("time"))
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn barra_factors(&self) -> Vec<String> {
        self.string_list("factors.barra")
    }

    pub fn industry_factors(&self) -> Vec<String> {
        self.string_list("factors.industry")
    }

    /// Barra factors followed by industry factors.
    pub fn all_factors(&self) -> Vec<String> {
        let mut factors = self.barra_factors();
        factors.extend(self.industry_factors());
        factors
    }

    /// The fallback date for `kind`, from the `dates` section or its
    /// built-in default.
    pub fn fallback_date(&self, kind: FallbackDateKind) -> String {
        let snap = self.snapshot();
        snap.general
            .get("dates")
            .and_then(Value::as_mapping)
            .and_then(|m| m.get(kind.config_key()))
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| kind.default_value().to_string())
    }

    /// Connection settings from the `database` section, if present and
    /// well-formed.
    pub fn database_settings(&self) -> Option<DatabaseSettings> {
        let snap = self.snapshot();
        let section = snap.database.pointer("database")?;
        match serde_json::from_value(serde_json::Value::from(section)) {
            Ok(settings) => Some(settings),
            Err(error) => {
                warn!(%error, "database section is malformed; ignoring");
                None
            }
        }
    }

    /// The MySQL connection URL assembled from the database settings.
    ///
    /// The returned string contains the password; callers must not log it.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        self.database_settings()
            .ok_or(ConfigError::MissingDatabaseConfig)?
            .url()
    }

    /// Pool sizing from the `connection_pool` section; defaults when the
    /// section is absent or malformed.
    pub fn connection_pool_settings(&self) -> ConnectionPoolSettings {
        let snap = self.snapshot();
        snap.database
            .pointer("connection_pool")
            .and_then(|section| {
                serde_json::from_value(serde_json::Value::from(section)).ok()
            })
            .unwrap_or_default()
    }

    /// The write definition for one table.
    pub fn table_config(&self, table_name: &str) -> Option<Value> {
        let snap = self.snapshot();
        snap.tables
            .as_mapping()
            .and_then(|m| m.get(table_name))
            .cloned()
    }

    /// All configured table names, in sorted order.
    pub fn table_names(&self) -> Vec<String> {
        self.snapshot()
            .tables
            .as_mapping()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn project_root(&self) -> PathBuf {
        self.snapshot().project_root.clone()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.snapshot().config_dir.clone()
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Discard every loaded document and re-run the full
    /// discovery-and-load sequence.
    ///
    /// The fresh snapshot is built first and swapped in under the writer
    /// lock, so concurrent readers see either the old or the new set,
    /// never a mixture.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let fresh = Snapshot::load(self.root_override.as_deref(), &self.start_dir)?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
        Ok(())
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        let snap = self.snapshot();
        snap.general
            .get(key)
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
