//! KPI command: one-shot KPI prompt against the backend.

use std::path::PathBuf;
use std::sync::Arc;

use lavoir::chat::{HttpBackend, KpiSession};
use lavoir::error::Result;
use lavoir::ingest::Ingester;

use crate::commands::auth_from_env;
use crate::table;

pub fn run(
    prompt: String,
    file: Option<PathBuf>,
    base_url: String,
    email: Option<String>,
) -> Result<()> {
    let auth = auth_from_env(email);
    let backend = Arc::new(HttpBackend::new(base_url)?);
    let session = KpiSession::new(backend);

    if let Some(file) = file {
        let ingested = Ingester::new().ingest_file(&file)?;
        session.load_dataset(ingested.dataset);
    }

    let reply = session.submit(&prompt, &auth)?;

    if let Some(turn) = session.transcript().last() {
        println!("{}", turn.content);
    }

    if let Some(kpis) = reply.kpi_data {
        println!();
        let headers = vec![
            "KPI".to_string(),
            "VALUE".to_string(),
            "UNIT".to_string(),
            "DESCRIPTION".to_string(),
        ];
        let rows: Vec<Vec<String>> = kpis
            .iter()
            .map(|kpi| {
                vec![
                    kpi.kpi_name.clone(),
                    kpi.value.to_string(),
                    kpi.unit.clone(),
                    kpi.description.clone(),
                ]
            })
            .collect();
        table::print_table(&headers, &rows);
    }
    Ok(())
}
