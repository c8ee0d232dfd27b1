//! Preview command: ingest a file and show the first rows.

use std::path::PathBuf;

use lavoir::error::Result;
use lavoir::ingest::{HeaderStrategy, IngestConfig, Ingester, DEFAULT_SENTINEL};

use crate::cli::HeaderChoice;
use crate::commands::dataset_rows;
use crate::table;

pub fn run(
    file: PathBuf,
    rows: usize,
    header: HeaderChoice,
    sentinel: Option<String>,
    header_row: Option<usize>,
) -> Result<()> {
    let strategy = resolve_strategy(header, sentinel, header_row);
    let ingester = Ingester::with_config(IngestConfig { header: strategy });
    let ingested = ingester.ingest_file(&file)?;

    println!(
        "{}: {} column(s), {} row(s), header row {} [{}]",
        ingested.source.file,
        ingested.source.column_count,
        ingested.source.row_count,
        ingested.source.header_row,
        ingested.source.format,
    );
    println!();

    table::print_table(
        &ingested.dataset.columns,
        &dataset_rows(&ingested.dataset, rows),
    );

    if ingested.dataset.row_count() > rows {
        println!("… {} more row(s)", ingested.dataset.row_count() - rows);
    }
    Ok(())
}

/// Resolve the CLI flags into a header strategy.
pub fn resolve_strategy(
    header: HeaderChoice,
    sentinel: Option<String>,
    header_row: Option<usize>,
) -> HeaderStrategy {
    match header {
        HeaderChoice::FirstRow => HeaderStrategy::FirstRow,
        HeaderChoice::Sentinel => HeaderStrategy::Sentinel {
            column: sentinel.unwrap_or_else(|| DEFAULT_SENTINEL.to_string()),
        },
        HeaderChoice::Index => HeaderStrategy::ExplicitIndex(header_row.unwrap_or(0)),
    }
}
