// Settings service exports

mod service;

pub use service::{resolve_data_file, SettingsService};
