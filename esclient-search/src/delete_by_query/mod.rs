//! Deleting every document that matches a query

mod request;
mod response;

pub use request::{DeleteByQueryRequest, QUERY_MISSING};
pub use response::{DeleteByQueryResponse, IndexDeleteByQueryResponse, ShardCounts};
