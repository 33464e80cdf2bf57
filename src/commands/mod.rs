//! Subcommand handlers for the `morrow` binary.

pub mod add;
pub mod edit;
pub mod import;
pub mod list;
pub mod remove;
mod render;
pub mod watch;

use std::path::PathBuf;

use morrow::models::settings::Settings;

/// Resolved configuration shared by every subcommand.
pub struct Context {
    pub settings: Settings,
    pub data_file: PathBuf,
}
