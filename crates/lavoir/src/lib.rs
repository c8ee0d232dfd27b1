//! Lavoir: prompt-driven data cleaning and KPI queries for tabular datasets.
//!
//! Lavoir ingests CSV and spreadsheet files into a shared tabular model,
//! applies declarative cleaning rules locally, and mediates free-text
//! instructions through an external interpretation backend.
//!
//! # Core Principles
//!
//! - **Two shapes, one model**: every dataset is losslessly convertible
//!   between matrix shape (header row + data rows) and record shape
//!   (one map per row), whichever the boundary at hand expects.
//! - **Explicit strategies**: header location in noisy files is a value
//!   the caller picks, not a hidden heuristic.
//! - **One exchange at a time**: each chat surface resolves a submission
//!   fully (one user turn, one assistant turn) before accepting the next.
//!
//! # Example
//!
//! ```no_run
//! use lavoir::ingest::Ingester;
//! use lavoir::rules::{predefined_rules, RuleEngine};
//!
//! let ingested = Ingester::new().ingest_file("fournisseurs.csv").unwrap();
//! let matrix = ingested.dataset.to_matrix();
//!
//! let engine = RuleEngine::new();
//! let cleaned = engine.apply(&predefined_rules()[0].rule, &matrix).unwrap();
//! println!("{} rows kept", cleaned.len() - 1);
//! ```

pub mod admin;
pub mod chat;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod rules;

pub use chat::{AuthContext, CleaningSession, HttpBackend, KpiSession, PromptBackend};
pub use dataset::{Cell, Dataset, Matrix, Record};
pub use error::{LavoirError, Result};
pub use ingest::{HeaderStrategy, Ingested, Ingester, SourceMetadata};
pub use rules::{CleaningRule, RuleEngine, RuleKind};
