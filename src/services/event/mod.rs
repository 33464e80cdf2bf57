//! Event services: list processing, GraphQL mapping and the local store.

pub mod convert;
pub mod filter;
mod persistence;
pub mod store;

pub use convert::{
    convert_graphql_event, convert_graphql_events, parse_graphql_payload, ConversionReport,
    GraphQlEvent,
};
pub use filter::{filter_events_by_search, filter_events_by_type, process_events, sort_events_by_date};
pub use persistence::EventSnapshot;
pub use store::{EventStore, ImportSummary};
