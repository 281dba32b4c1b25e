//! # esclient search
//!
//! Search-side requests: query builders, the delete-by-query request and
//! response, request factories and script fields.
//!
//! ```rust
//! use esclient_search::{query::match_all_query, requests};
//!
//! let request = requests::delete_by_query_request(["logs"])
//!     .with_query(&match_all_query())
//!     .unwrap()
//!     .with_types(["event"]);
//! assert!(request.validate().is_none());
//! ```

pub mod delete_by_query;
pub mod query;
pub mod replication;
pub mod requests;
pub mod script_fields;

pub use delete_by_query::{
    DeleteByQueryRequest, DeleteByQueryResponse, IndexDeleteByQueryResponse, ShardCounts,
    QUERY_MISSING,
};
pub use query::{MatchAllQueryBuilder, QueryBuilder, TermQueryBuilder, WrapperQueryBuilder};
pub use replication::{
    IndicesReplicationRequest, ReplicationType, WriteConsistencyLevel, DEFAULT_REPLICATION_TIMEOUT,
};
pub use script_fields::{ContentScript, ScriptField, ScriptFieldsContext};
