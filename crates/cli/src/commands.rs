//! Command dispatch.
//!
//! Each subcommand builds on the resolver's public surface only; no
//! document is read directly here.

use anyhow::Context;
use factor_config::{ConfigError, ConfigResolver};
use serde_json::json;

use crate::args::{Cli, Commands, OutputFormat};
use crate::error::ExitCode;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut builder = ConfigResolver::builder().with_env_prefix(cli.env_prefix.clone());
    if let Some(ref root) = cli.config_root {
        builder = builder.with_root(root);
    }
    let resolver = builder.build().context("failed to load configuration")?;
    tracing::debug!(
        project_root = %resolver.project_root().display(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Get { key, default } => get(&resolver, &key, default.as_deref(), cli.output),
        Commands::Path { logical_name } => path(&resolver, &logical_name, cli.output),
        Commands::Sources { category } => sources(&resolver, &category, cli.output),
        Commands::Index { display_name, kind } => {
            index(&resolver, &display_name, kind.into(), cli.output)
        }
        Commands::Check => check(&resolver, cli.output),
    }
}

fn get(
    resolver: &ConfigResolver,
    key: &str,
    default: Option<&str>,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let resolved = resolver
        .get(key)
        .or_else(|| default.map(|raw| factor_config::coerce_env_value(raw)));
    match resolved {
        Some(value) => {
            match output {
                OutputFormat::Text => println!("{value}"),
                OutputFormat::Json => println!("{}", serde_json::Value::from(&value)),
            }
            Ok(ExitCode::Success)
        }
        None => {
            eprintln!("key '{key}' is not set in any configuration source");
            Ok(ExitCode::NotFound)
        }
    }
}

fn path(
    resolver: &ConfigResolver,
    logical_name: &str,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    match resolver.resolve_path(logical_name) {
        Ok(Some(resolved)) => {
            match output {
                OutputFormat::Text => println!("{}", resolved.display()),
                OutputFormat::Json => println!("{}", json!({ "path": resolved })),
            }
            Ok(ExitCode::Success)
        }
        Ok(None) => {
            eprintln!("logical path name '{logical_name}' is not mapped");
            Ok(ExitCode::NotFound)
        }
        Err(error @ ConfigError::AmbiguousPlacement { .. }) => {
            Err(anyhow::Error::new(error).context("path table row is invalid"))
        }
        Err(error) => Err(error.into()),
    }
}

fn sources(
    resolver: &ConfigResolver,
    category: &str,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let sources = resolver.data_source_priority(category);
    match output {
        OutputFormat::Text => {
            for source in &sources {
                match source.rank {
                    Some(rank) => println!("{rank}\t{}", source.source_name),
                    None => println!("-\t{}", source.source_name),
                }
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = sources
                .iter()
                .map(|s| json!({ "source_name": s.source_name, "rank": s.rank }))
                .collect();
            println!("{}", serde_json::Value::Array(entries));
        }
    }
    if sources.is_empty() {
        eprintln!("no data sources configured for category '{category}'");
        return Ok(ExitCode::NotFound);
    }
    Ok(ExitCode::Success)
}

fn index(
    resolver: &ConfigResolver,
    display_name: &str,
    kind: factor_config::IndexMappingKind,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    match resolver.index_mapping(display_name, kind) {
        Some(alias) => {
            match output {
                OutputFormat::Text => println!("{alias}"),
                OutputFormat::Json => println!("{}", json!({ "alias": alias })),
            }
            Ok(ExitCode::Success)
        }
        None => {
            eprintln!("index '{display_name}' has no {kind:?} mapping");
            Ok(ExitCode::NotFound)
        }
    }
}

fn check(resolver: &ConfigResolver, output: OutputFormat) -> anyhow::Result<ExitCode> {
    let path_names = resolver.logical_path_names();
    let table_names = resolver.table_names();
    let has_database = resolver.database_settings().is_some();
    let pool = resolver.connection_pool_settings();
    let has_general = resolver.get("data_source_priority").is_some()
        || resolver.get("factors").is_some()
        || resolver.get("index_mapping").is_some();

    match output {
        OutputFormat::Text => {
            println!("project root:    {}", resolver.project_root().display());
            println!("config dir:      {}", resolver.config_dir().display());
            println!("env prefix:      {}", resolver.env_prefix());
            println!("general config:  {}", if has_general { "loaded" } else { "missing or empty" });
            println!("database config: {}", if has_database { "loaded" } else { "missing or empty" });
            println!("pool size:       {}", pool.pool_size);
            println!("path entries:    {}", path_names.len());
            println!("table configs:   {}", table_names.len());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "project_root": resolver.project_root(),
                    "config_dir": resolver.config_dir(),
                    "env_prefix": resolver.env_prefix(),
                    "general_loaded": has_general,
                    "database_loaded": has_database,
                    "pool_size": pool.pool_size,
                    "path_entries": path_names,
                    "table_configs": table_names,
                })
            );
        }
    }
    Ok(ExitCode::Success)
}
