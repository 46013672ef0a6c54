use std::path::Path;

use journal_core::JournalConfig;
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::commands::common::resolve_db_path;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    config_path: String,
    resolved_database_path: String,
    #[serde(flatten)]
    config: &'a JournalConfig,
}

pub fn run_config(
    command: Option<ConfigCommands>,
    config: &JournalConfig,
    config_path: &Path,
) -> Result<(), CliError> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => run_config_show(config, config_path),
        ConfigCommands::Init {
            user_id,
            database_path,
            log_filter,
        } => run_config_init(config_path, user_id, database_path, log_filter),
    }
}

fn run_config_show(config: &JournalConfig, config_path: &Path) -> Result<(), CliError> {
    let effective = EffectiveConfig {
        config_path: config_path.display().to_string(),
        resolved_database_path: resolve_db_path(config)?.display().to_string(),
        config,
    };
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}

/// Merge explicit values into the stored config file and write it back.
///
/// Only the file is read here; environment overrides never get persisted.
pub fn run_config_init(
    config_path: &Path,
    user_id: Option<String>,
    database_path: Option<String>,
    log_filter: Option<String>,
) -> Result<(), CliError> {
    let mut config = JournalConfig::load(config_path)?.with_overrides(user_id, database_path);
    if let Some(log_filter) = log_filter.filter(|value| !value.trim().is_empty()) {
        config.log_filter = Some(log_filter.trim().to_string());
    }

    config.save(config_path)?;
    println!("Wrote {}", config_path.display());
    Ok(())
}
