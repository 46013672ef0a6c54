//! Journal CLI - Command-line interface for dated journal entries
//!
//! Month calendar, per-day entry lists, and bulk edits from the terminal.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use journal_core::JournalConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::bulk::run_bulk;
use crate::commands::calendar::run_calendar;
use crate::commands::common::{open_store, resolve_config_path, resolve_date, resolve_db_path};
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::hide::run_hide;
use crate::commands::list::run_list;
use crate::commands::quick::run_quick;
use crate::commands::show::run_show;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "journal=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.clone())?;
    let mut config = JournalConfig::load(&config_path)?
        .with_env_overrides()
        .with_overrides(cli.user.clone(), None);
    if let Some(db_path) = cli.db_path.clone() {
        config.database_path = Some(db_path);
    }
    config.validate()?;

    init_tracing(config.log_filter.as_deref());

    let command = match cli.command {
        Some(command) => command,
        None if cli.note.is_empty() => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
            return Ok(());
        }
        // Quick note mode: journal "my thought"
        None => Commands::Quick {
            url_encoded: false,
            text: cli.note,
        },
    };

    match command {
        Commands::Calendar { offset, date, json } => {
            run_calendar(offset, resolve_date(date.as_deref()), json)?;
        }
        Commands::Config { command } => run_config(command, &config, &config_path)?,
        command => {
            let db_path = resolve_db_path(&config)?;
            let store = open_store(&db_path, &config)?;

            match command {
                Commands::Add { date, text } => {
                    run_add(&store, resolve_date(date.as_deref()), &text).await?;
                }
                Commands::Quick { url_encoded, text } => {
                    run_quick(&store, &text, url_encoded).await?;
                }
                Commands::List { date, all, json } => {
                    run_list(&store, resolve_date(date.as_deref()), all, json).await?;
                }
                Commands::Show { id, json } => run_show(&store, &id, json).await?,
                Commands::Edit { date, id, text } => {
                    run_edit(&store, resolve_date(date.as_deref()), &id, &text).await?;
                }
                Commands::Delete { date, id } => {
                    run_delete(&store, resolve_date(date.as_deref()), &id).await?;
                }
                Commands::Hide { date, id } => {
                    run_hide(&store, resolve_date(date.as_deref()), &id).await?;
                }
                Commands::Bulk {
                    operation,
                    date,
                    ids,
                } => {
                    run_bulk(
                        &store,
                        operation.into(),
                        resolve_date(date.as_deref()),
                        &ids,
                    )
                    .await?;
                }
                Commands::Calendar { .. } | Commands::Config { .. } => {}
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the config's `log_filter`, which wins over the default.
fn init_tracing(log_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
