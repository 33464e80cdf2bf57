use anyhow::{bail, Context as _, Result};
use clap::Args;
use morrow::models::event::{EventChanges, EventVisibility};
use morrow::services::event::EventStore;
use morrow::utils::date::{format_event_start_date, parse_instant};

use super::Context;

#[derive(Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    /// New start date, same formats as `add --date`
    #[arg(short, long)]
    pub date: Option<String>,

    /// New end date
    #[arg(long, conflicts_with = "clear_end")]
    pub end: Option<String>,

    /// Remove the end date
    #[arg(long)]
    pub clear_end: bool,

    /// New description; an empty value removes it
    #[arg(long)]
    pub description: Option<String>,

    /// New emoji; an empty value removes it
    #[arg(long)]
    pub emoji: Option<String>,

    #[arg(long)]
    pub visibility: Option<EventVisibility>,
}

pub fn run(ctx: &Context, args: EditArgs) -> Result<()> {
    let date = args
        .date
        .as_deref()
        .map(|value| parse_instant(value).with_context(|| format!("Invalid --date {:?}", value)))
        .transpose()?;
    let end_time = args
        .end
        .as_deref()
        .map(|value| parse_instant(value).with_context(|| format!("Invalid --end {:?}", value)))
        .transpose()?;

    let changes = EventChanges {
        title: args.title,
        description: args.description,
        date,
        end_time,
        clear_end_time: args.clear_end,
        emoji: args.emoji,
        visibility: args.visibility,
    };
    if changes.is_empty() {
        bail!("Nothing to change for {}", args.id);
    }

    let mut store = EventStore::open(&ctx.data_file)?;
    let edited = store.edit(&args.id, &changes)?;
    store.save()?;

    println!(
        "Updated {} ({}) {}",
        edited.title,
        format_event_start_date(edited.date, ctx.settings.date_locale),
        edited.id
    );
    Ok(())
}
