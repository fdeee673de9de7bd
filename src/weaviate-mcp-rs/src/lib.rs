//! weaviate-mcp Client Library
//!
//! Async HTTP client for the Weaviate REST and GraphQL API, built per call
//! from a [`Credentials`] value.

mod client;
mod error;
pub mod http;
pub mod telemetry;

pub use client::Client;
pub use error::{ClientError, ErrorKind};
pub use http::ApiRequest;
pub use weaviate_mcp_core::{Credentials, PaginatedResult, ProviderKeys, QueryOptions, WhereFilter};

pub type Result<T> = std::result::Result<T, ClientError>;
