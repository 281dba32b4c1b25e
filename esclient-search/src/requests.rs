//! Shorthand constructors for requests

use crate::delete_by_query::DeleteByQueryRequest;
use tracing::debug;

/// A delete-by-query request against `indices`; pass none for all indices
///
/// The query source must still be set before the request validates.
pub fn delete_by_query_request<I, S>(indices: I) -> DeleteByQueryRequest
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = DeleteByQueryRequest::new(indices);
    debug!(indices = ?request.indices(), "created delete-by-query request");
    request
}
