//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod query;
pub mod rates;

// Re-export main types for cleaner imports
pub use error::{FetchError, QueryError};
pub use query::{Query, parse_input, query_rates};
pub use rates::{CurrencyQuote, RateFetcher, RawDateResult, RawRateEntry, Report};
