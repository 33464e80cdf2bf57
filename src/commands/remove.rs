use anyhow::{bail, Result};
use morrow::services::event::EventStore;

use super::Context;

pub fn run(ctx: &Context, id: &str) -> Result<()> {
    let mut store = EventStore::open(&ctx.data_file)?;
    if !store.delete(id) {
        bail!("No event with id {}", id);
    }
    store.save()?;

    println!("Removed {}", id);
    Ok(())
}
