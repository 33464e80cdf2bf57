use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use morrow::services::event::{convert_graphql_events, parse_graphql_payload, EventStore};

use super::Context;

pub fn run(ctx: &Context, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file {}", file.display()))?;
    let records = parse_graphql_payload(&json)
        .with_context(|| format!("Failed to parse import file {}", file.display()))?;

    let report = convert_graphql_events(&records);
    let mut store = EventStore::open(&ctx.data_file)?;
    let summary = store.import(report.events);
    store.save()?;

    println!(
        "Imported {} record(s): {} added, {} updated, {} rejected",
        records.len(),
        summary.added,
        summary.updated,
        report.rejected.len()
    );
    for (id, err) in &report.rejected {
        println!("  skipped {}: {}", id, err);
    }
    Ok(())
}
