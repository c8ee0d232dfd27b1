//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lavoir::rules::RuleKind;

/// Lavoir: prompt-driven data cleaning for tabular files
#[derive(Parser)]
#[command(name = "lavoir")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a file and show the first rows
    Preview {
        /// Path to the data file (CSV/XLSX/XLS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to display
        #[arg(short, long, default_value = "20")]
        rows: usize,

        /// Header strategy for spreadsheets
        #[arg(long, default_value = "sentinel")]
        header: HeaderChoice,

        /// Sentinel column name (with --header sentinel)
        #[arg(long)]
        sentinel: Option<String>,

        /// Header row index (with --header index)
        #[arg(long)]
        header_row: Option<usize>,
    },

    /// List the predefined cleaning rules
    Rules,

    /// Apply a cleaning rule to a file
    Clean {
        /// Path to the data file (CSV/XLSX/XLS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Catalog rule id to apply
        #[arg(short, long, conflicts_with_all = ["kind", "column", "value"])]
        rule: Option<u32>,

        /// Ad-hoc rule kind (delete-rows, deduplicate)
        #[arg(long)]
        kind: Option<KindChoice>,

        /// Target column for an ad-hoc rule
        #[arg(short, long)]
        column: Option<String>,

        /// Comparison value for delete-rows
        #[arg(long)]
        value: Option<String>,

        /// Write the cleaned dataset to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive cleaning chat against the backend
    Chat {
        /// Path to the data file to load
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Backend base URL
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,

        /// Email forwarded to the backend
        #[arg(long)]
        email: Option<String>,
    },

    /// One-shot KPI prompt against the backend
    Kpi {
        /// The KPI question
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// Path to the data file to query
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Backend base URL
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,

        /// Email forwarded to the backend
        #[arg(long)]
        email: Option<String>,
    },

    /// Administration queries
    Admin {
        #[command(subcommand)]
        action: AdminAction,

        /// Backend base URL
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// List organizations with quota usage
    Orgs,

    /// Show one organization's quota
    Quota {
        /// Organization id
        #[arg(value_name = "ORG_ID")]
        organization: String,
    },

    /// List the users of an organization
    Users {
        /// Organization id
        #[arg(value_name = "ORG_ID")]
        organization: String,
    },
}

/// Header strategy choice for spreadsheet ingestion.
#[derive(Clone, Debug, Default)]
pub enum HeaderChoice {
    /// Row 0 is the header.
    FirstRow,
    /// Sentinel-column detection (the default).
    #[default]
    Sentinel,
    /// Explicit header row index (--header-row).
    Index,
}

impl std::str::FromStr for HeaderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-row" | "first" => Ok(HeaderChoice::FirstRow),
            "sentinel" => Ok(HeaderChoice::Sentinel),
            "index" | "explicit" => Ok(HeaderChoice::Index),
            _ => Err(format!(
                "Unknown header strategy: {}. Use first-row, sentinel, or index.",
                s
            )),
        }
    }
}

impl std::fmt::Display for HeaderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderChoice::FirstRow => write!(f, "first-row"),
            HeaderChoice::Sentinel => write!(f, "sentinel"),
            HeaderChoice::Index => write!(f, "index"),
        }
    }
}

/// Ad-hoc rule kind choice.
#[derive(Clone, Debug)]
pub enum KindChoice {
    DeleteRows,
    Deduplicate,
}

impl From<&KindChoice> for RuleKind {
    fn from(choice: &KindChoice) -> Self {
        match choice {
            KindChoice::DeleteRows => RuleKind::DeleteRows,
            KindChoice::Deduplicate => RuleKind::Deduplicate,
        }
    }
}

impl std::str::FromStr for KindChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "delete-rows" | "delete" => Ok(KindChoice::DeleteRows),
            "deduplicate" | "dedupe" => Ok(KindChoice::Deduplicate),
            _ => Err(format!(
                "Unknown rule kind: {}. Use delete-rows or deduplicate.",
                s
            )),
        }
    }
}

impl std::fmt::Display for KindChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindChoice::DeleteRows => write!(f, "delete-rows"),
            KindChoice::Deduplicate => write!(f, "deduplicate"),
        }
    }
}
