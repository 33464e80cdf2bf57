// Service module exports

pub mod countdown;
pub mod event;
pub mod settings;
