use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use journal_core::BulkOperation;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Dated journal entries from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// User whose entries are read and written
    #[arg(long, global = true, value_name = "NAME")]
    pub user: Option<String>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Quick note: journal "my thought here"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a month calendar
    #[command(alias = "cal")]
    Calendar {
        /// Months away from the reference month (negative for the past)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
        /// Reference date (yyyy-M-d), today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an entry to a day
    #[command(alias = "new")]
    Add {
        /// Day to write to (yyyy-M-d), today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Entry text; an empty entry is created when omitted
        text: Vec<String>,
    },
    /// Add a quick note to today
    Quick {
        /// Treat the text as URL-encoded
        #[arg(long)]
        url_encoded: bool,
        /// Note text
        text: Vec<String>,
    },
    /// List a day's entries
    List {
        /// Day to list (yyyy-M-d), today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Include hidden entries
        #[arg(short, long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry in full
    Show {
        /// Full entry ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace an entry's text
    Edit {
        /// Day the entry belongs to, today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Entry ID or unique ID prefix
        id: String,
        /// New text (read from stdin when omitted)
        text: Vec<String>,
    },
    /// Delete an entry
    Delete {
        /// Day the entry belongs to, today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Toggle whether an entry is hidden
    Hide {
        /// Day the entry belongs to, today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Apply one operation to several entries of a day
    Bulk {
        /// Operation to apply
        #[arg(value_enum)]
        operation: BulkAction,
        /// Day the entries belong to, today when omitted
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Entry IDs or unique ID prefixes
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or write the config file
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum BulkAction {
    Delete,
    Hide,
}

impl From<BulkAction> for BulkOperation {
    fn from(value: BulkAction) -> Self {
        match value {
            BulkAction::Delete => Self::Delete,
            BulkAction::Hide => Self::Hide,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Initialize or update the config file
    Init {
        /// Default user
        #[arg(long, value_name = "NAME")]
        user_id: Option<String>,
        /// Database file location
        #[arg(long, value_name = "PATH")]
        database_path: Option<String>,
        /// Log filter directive, e.g. journal=debug
        #[arg(long, value_name = "FILTER")]
        log_filter: Option<String>,
    },
}
