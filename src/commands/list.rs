use anyhow::Result;
use chrono::Utc;
use clap::Args;
use morrow::models::event::EventFilter;
use morrow::services::event::{process_events, EventStore};

use super::{render, Context};

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive match on title or description
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// all, upcoming or ended (defaults to the configured filter)
    #[arg(short, long)]
    pub filter: Option<EventFilter>,
}

pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let store = EventStore::open(&ctx.data_file)?;
    let now = Utc::now();
    let filter = args.filter.unwrap_or(ctx.settings.default_filter);

    let events = process_events(store.events(), &args.search, filter, now);
    log::debug!(
        "{} of {} event(s) match filter={} search={:?}",
        events.len(),
        store.events().len(),
        filter,
        args.search
    );

    if events.is_empty() {
        println!("No events found");
        return Ok(());
    }

    for event in &events {
        println!("{}", render::event_line(event, now, ctx.settings.date_locale));
    }
    Ok(())
}
