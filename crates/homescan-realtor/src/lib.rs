//! Search orchestration against the realtor.com GraphQL API.
//!
//! A search resolves free text into a [`LocationDescriptor`], picks a
//! [`SearchStrategy`], builds a [`QueryPlan`] per page, fetches pages
//! concurrently up to the caller's limit, optionally enriches each page with
//! one batched detail call, and finally re-applies the pending-listing date
//! window client-side.

pub mod client;
pub mod config;
pub mod dates;
pub mod enrich;
pub mod error;
pub mod location;
pub mod normalize;
pub mod pending;
pub mod query;
pub mod retry;
pub mod search;
pub mod strategy;
mod templates;

pub use client::{PageResult, RealtorClient};
pub use config::EngineConfig;
pub use dates::DateSpec;
pub use enrich::merge_extra_detail;
pub use error::RealtorError;
pub use location::{Coordinates, LocationDescriptor, LocationKind};
pub use normalize::{normalize, NormalizeOptions};
pub use pending::{filter_pending, parse_pending_date, DateWindow, PendingCandidate, PendingView};
pub use query::{QueryBuilder, QueryError, QueryPlan, SearchFilters};
pub use retry::RetryPolicy;
pub use search::SearchRequest;
pub use strategy::SearchStrategy;
