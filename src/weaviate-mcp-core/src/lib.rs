//! weaviate-mcp Core Library
//!
//! I/O-free building blocks for the Weaviate client:
//! - Per-call credentials and auth headers
//! - `where` filter trees
//! - Pagination bookkeeping
//! - Search parameters and GraphQL query synthesis
//! - REST payload models
//! - JSON configuration

pub mod config;
pub mod credentials;
pub mod filter;
pub mod graphql;
pub mod models;
pub mod pagination;
pub mod search;

// Re-export commonly used types
pub use config::{Config, LogConfig};
pub use credentials::{Credentials, ProviderKeys};
pub use filter::{FilterError, FilterOperator, FilterValue, GeoRange, WhereFilter};
pub use graphql::{build_get_query, GraphQLResponse, DEFAULT_LIMIT};
pub use models::*;
pub use pagination::{has_more_items, next_offset, PaginatedResult};
pub use search::{
    Bm25Params, FusionType, HybridParams, MoveParams, NearObjectParams, NearTextParams,
    NearVectorParams, NonFiniteNumber, QueryOptions, SearchClause,
};
