use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use morrow::models::event::EventFilter;
use morrow::services::countdown::{CountdownBoard, SystemClock};
use morrow::services::event::{process_events, EventStore};

use super::{render, Context};

#[derive(Args)]
pub struct WatchArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,

    #[arg(short, long)]
    pub filter: Option<EventFilter>,

    /// Print the countdowns once and exit
    #[arg(long)]
    pub once: bool,
}

pub async fn run(ctx: &Context, args: WatchArgs) -> Result<()> {
    let store = EventStore::open(&ctx.data_file)?;
    let filter = args.filter.unwrap_or(ctx.settings.default_filter);
    let events = process_events(store.events(), &args.search, filter, Utc::now());

    if events.is_empty() {
        println!("No events to watch");
        return Ok(());
    }

    let mut board = CountdownBoard::new(SystemClock::shared(), ctx.settings.tick_interval());
    let synced = board.sync(&events);
    log::info!(
        "Watching {} countdown(s), {} active",
        synced.mounted.len(),
        board.active_count()
    );

    let interactive = io::stdout().is_terminal();
    draw(&board, interactive)?;
    if args.once {
        return Ok(());
    }

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        if board.all_expired() {
            println!("All countdowns have ended");
            break;
        }

        tokio::select! {
            result = &mut interrupt => {
                result?;
                log::debug!("Interrupted");
                break;
            }
            _ = board.changed() => draw(&board, interactive)?,
        }
    }

    board.clear();
    Ok(())
}

fn draw(board: &CountdownBoard, interactive: bool) -> Result<()> {
    if interactive {
        render::clear_screen();
    }
    let mut stdout = io::stdout().lock();
    for line in render::board_lines(&board.snapshot()) {
        writeln!(stdout, "{}", line)?;
    }
    stdout.flush()?;
    Ok(())
}
