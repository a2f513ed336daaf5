//! Event query & insight engine: validated queries, the
//! filter → sort → paginate pipeline, derived analytics, and the
//! permission-gated service facade over the repositories.

pub mod filter;
pub mod insights;
pub mod paginate;
pub mod query;
pub mod seed;
pub mod service;
pub mod sort;
pub mod store;

pub use filter::apply_filters;
pub use insights::{compute_insights, InsightSummary};
pub use paginate::{paginate, Page, PageMeta};
pub use query::{validate_query, EventQuery, SortBy, SortDir};
pub use seed::seed_events;
pub use service::InsightService;
pub use sort::apply_sort;
pub use store::{
    EventDraft, EventPatch, EventRepository, MemoryEventStore, MemoryUserDirectory, UserDirectory,
};
