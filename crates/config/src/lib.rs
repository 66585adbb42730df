//! Configuration resolution for the factor data update pipeline.
//!
//! This crate is the single point of truth for pipeline settings: it loads
//! layered YAML documents, a legacy path-mapping table, and environment
//! variable overrides, and exposes a dotted-key lookup with defined
//! precedence plus derived projections (data-source priorities, index name
//! mappings, database settings, resolved filesystem paths).

pub mod constants;
mod discover;
mod env;
mod error;
mod paths;
mod projections;
mod resolver;
mod store;
mod value;

pub use discover::{above_project_root, find_root, volume_root};
pub use env::{coerce_env_value, env_override, env_var_or_none, load_dotenv};
pub use error::ConfigError;
pub use paths::{PathEntry, PathTable, PlacementMode};
pub use projections::{
    ConnectionPoolSettings, DataSource, DatabaseSettings, FallbackDateKind, IndexMappingKind,
};
pub use resolver::{ConfigResolver, ConfigResolverBuilder};
pub use store::ConfigStore;
pub use value::Value;
