use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use morrow::models::event::{Event, EventVisibility};
use morrow::services::event::EventStore;
use morrow::utils::date::{format_event_start_date, parse_instant};

use super::Context;

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: String,

    /// Start date: RFC 3339, local `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD`
    #[arg(short, long)]
    pub date: String,

    /// End date, same formats as --date
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub emoji: Option<String>,

    /// private, shared or public
    #[arg(long, default_value = "private")]
    pub visibility: EventVisibility,
}

pub fn run(ctx: &Context, args: AddArgs) -> Result<()> {
    let date = parse_instant(&args.date).with_context(|| format!("Invalid --date {:?}", args.date))?;

    let mut builder = Event::builder()
        .title(args.title)
        .date(date)
        .visibility(args.visibility);
    if let Some(end) = &args.end {
        let end_time = parse_instant(end).with_context(|| format!("Invalid --end {:?}", end))?;
        builder = builder.end_time(end_time);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    if let Some(emoji) = args.emoji {
        builder = builder.emoji(emoji);
    }
    let event = builder.build()?;

    if event.is_ended(Utc::now()) {
        log::warn!("Event {:?} starts in the past and will show as ended", event.title);
    }

    let mut store = EventStore::open(&ctx.data_file)?;
    let created = store.create(event)?;
    store.save()?;

    println!(
        "Added {} ({}) {}",
        created.title,
        format_event_start_date(created.date, ctx.settings.date_locale),
        created.id
    );
    Ok(())
}
