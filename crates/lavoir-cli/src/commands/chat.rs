//! Chat command: interactive cleaning loop against the backend.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lavoir::chat::{CleaningSession, HttpBackend, ResponseKind};
use lavoir::error::Result;
use lavoir::ingest::Ingester;

use crate::commands::{auth_from_env, write_csv};

pub fn run(file: PathBuf, base_url: String, email: Option<String>) -> Result<()> {
    let ingested = Ingester::new().ingest_file(&file)?;
    println!(
        "Loaded {} ({} row(s), {} column(s))",
        ingested.source.file, ingested.source.row_count, ingested.source.column_count
    );

    let auth = auth_from_env(email);
    let backend = Arc::new(HttpBackend::new(base_url)?);
    let session = CleaningSession::new(backend);
    session.load_dataset(ingested.dataset);

    println!("Type an instruction, ':save <path>' to export, ':quit' to leave.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == ":quit" || line == ":q" {
            break;
        }
        if let Some(path) = line.strip_prefix(":save ") {
            save(&session, Path::new(path.trim()));
            continue;
        }

        match session.submit(line, &auth) {
            Ok(reply) => {
                // The assistant message is the last transcript turn.
                if let Some(turn) = session.transcript().last() {
                    println!("{}", turn.content);
                }
                if reply.kind == ResponseKind::Action {
                    if let Some(summary) = reply.summary {
                        println!(
                            "  rows: {} -> {} ({} modified)",
                            summary.rows_before, summary.rows_after, summary.rows_modified
                        );
                    }
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}

fn save(session: &CleaningSession, path: &Path) {
    let Some(dataset) = session.dataset() else {
        println!("error: no dataset to save");
        return;
    };
    match write_csv(&dataset, path) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => println!("error: {e}"),
    }
}
