//! Core proxy abstractions

pub mod adapter;
pub mod codes;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod log;
pub mod series;

// Re-export main types for cleaner imports
pub use adapter::ProviderAdapter;
pub use error::ProxyError;
pub use fetch::{FetchError, FetchExecutor, UpstreamResponse};
pub use handler::{RequestHandler, ResponseEnvelope};
pub use series::{CanonicalSeries, IndicatorRequest, NormalizedPayload};
