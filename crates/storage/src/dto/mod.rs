pub mod common;
pub mod filter;
pub mod query;
pub mod ranking;

pub use common::{PaginatedResponse, PaginationMeta, PaginationParams};
pub use filter::{BodyWeightRange, FederationFilter, FilterConfig, WeightClassSelection};
pub use query::RankingsQuery;
pub use ranking::{RankingMetric, SortKey, SortOrder};
