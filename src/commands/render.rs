use chrono::{DateTime, Utc};
use morrow::models::event::Event;
use morrow::services::countdown::CountdownSnapshot;
use morrow::utils::date::{format_event_start_date, DateLocale};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn event_line(event: &Event, now: DateTime<Utc>, locale: DateLocale) -> String {
    let emoji = event.emoji.as_deref().unwrap_or("-");
    format!(
        "{} {:<28} {:<24} {:>16}  {}",
        emoji,
        event.title,
        format_event_start_date(event.date, locale),
        event.time_remaining(now).to_string(),
        event.id
    )
}

pub fn board_lines(snapshots: &[CountdownSnapshot]) -> Vec<String> {
    snapshots
        .iter()
        .map(|card| format!("{:<28} {:>16}", card.title, card.remaining.to_string()))
        .collect()
}

pub fn clear_screen() {
    print!("{CLEAR_SCREEN}");
}
