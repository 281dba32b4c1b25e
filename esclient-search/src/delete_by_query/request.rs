//! The delete-by-query request and its wire form

use crate::query::QueryBuilder;
use crate::replication::{IndicesReplicationRequest, ReplicationType, WriteConsistencyLevel};
use bytes::Bytes;
use esclient_common::xcontent::convert_to_json;
use esclient_common::{
    add_validation_error, ActionRequestValidationError, BytesReference, EsClientError, Result,
    SharedBuffer, StreamInput, StreamOutput, Streamable, TimeValue, XContentBuilder, CONTENT_TYPE,
};
use serde_json::{Map, Value};
use std::fmt;
use tracing::trace;

/// Message recorded when a request is validated without a query
pub const QUERY_MISSING: &str = "query is missing";

/// A request to delete all documents matching a query
///
/// The query source is required; set it with one of the `with_query*` methods.
/// A source taken from a shared buffer with `unsafe_source = true` is copied the
/// first time it is read, so later writes by the buffer's owner cannot change
/// what this request sends.
///
/// ```rust
/// use esclient_search::DeleteByQueryRequest;
///
/// let request = DeleteByQueryRequest::new(["tweets"])
///     .with_query_bytes(&b"{}"[..])
///     .with_types(["user", "order"])
///     .with_routing("shard-3");
/// assert!(request.validate().is_none());
/// assert_eq!(request.routing(), Some("shard-3"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeleteByQueryRequest {
    base: IndicesReplicationRequest,
    query_source: Option<BytesReference>,
    query_source_unsafe: bool,
    types: Vec<String>,
    routing: Option<String>,
}

impl DeleteByQueryRequest {
    /// A request against `indices`; no indices means all indices
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: IndicesReplicationRequest::new(indices),
            ..Self::default()
        }
    }

    /// `None` when the request may be sent
    ///
    /// Only an absent query fails; an empty query source that was set
    /// explicitly is accepted and left for the cluster to reject.
    pub fn validate(&self) -> Option<ActionRequestValidationError> {
        let mut validation = self.base.validate();
        if self.query_source.is_none() {
            validation = Some(add_validation_error(QUERY_MISSING, validation));
        }
        validation
    }

    /// The query source to execute
    ///
    /// An unsafe source is replaced by a private copy on the first call; later
    /// calls return that copy without copying again.
    pub fn query_source(&mut self) -> Option<&BytesReference> {
        if self.query_source_unsafe {
            if let Some(source) = &self.query_source {
                trace!(len = source.len(), "copying unsafe query source");
                self.query_source = Some(source.copy_bytes_array());
            }
            self.query_source_unsafe = false;
        }
        self.query_source.as_ref()
    }

    /// Whether the held query source still aliases a shared buffer
    pub fn is_query_source_unsafe(&self) -> bool {
        self.query_source_unsafe
    }

    /// The query to execute, rendered from a query builder
    pub fn with_query<Q: QueryBuilder + ?Sized>(self, query: &Q) -> Result<Self> {
        let source = query.build_as_bytes(CONTENT_TYPE)?;
        Ok(self.with_query_source(BytesReference::Array(source), false))
    }

    /// The query to execute, as text
    pub fn with_query_string(self, query: &str) -> Self {
        self.with_query_bytes(Bytes::copy_from_slice(query.as_bytes()))
    }

    /// The query to execute in the form of a map
    pub fn with_query_map(self, query: &Map<String, Value>) -> Result<Self> {
        let builder = XContentBuilder::new(CONTENT_TYPE).map(query);
        let source = builder.bytes().map_err(|e| EsClientError::Generation {
            what: Value::Object(query.clone()).to_string(),
            message: e.to_string(),
        })?;
        Ok(self.with_query_source(BytesReference::Array(source), false))
    }

    /// The query to execute, rendered from a content builder
    pub fn with_query_builder(self, builder: &XContentBuilder) -> Result<Self> {
        let source = builder.bytes()?;
        Ok(self.with_query_source(BytesReference::Array(source), false))
    }

    /// The query to execute, as owned bytes
    pub fn with_query_bytes(self, query: impl Into<Bytes>) -> Self {
        self.with_query_source(BytesReference::Array(query.into()), false)
    }

    /// The query to execute, as a range of a shared buffer
    ///
    /// Pass `unsafe_source = true` when the buffer's owner may rewrite it.
    pub fn with_query_range(
        self,
        buffer: &SharedBuffer,
        offset: usize,
        length: usize,
        unsafe_source: bool,
    ) -> Result<Self> {
        let source = buffer.slice(offset, length)?;
        Ok(self.with_query_source(source, unsafe_source))
    }

    pub fn with_query_source(mut self, source: BytesReference, unsafe_source: bool) -> Self {
        self.query_source = Some(source);
        self.query_source_unsafe = unsafe_source;
        self
    }

    /// The types of documents the query will run against; empty means all types
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// A comma separated list of routing values selecting the shards to run on
    pub fn routing(&self) -> Option<&str> {
        self.routing.as_deref()
    }

    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Routing values, joined with commas
    pub fn with_routings<I, S>(mut self, routings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = routings
            .into_iter()
            .map(|r| r.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.routing = Some(joined);
        self
    }

    pub fn indices(&self) -> &[String] {
        &self.base.indices
    }

    pub fn with_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(&self) -> TimeValue {
        self.base.timeout
    }

    pub fn with_timeout(mut self, timeout: impl Into<TimeValue>) -> Self {
        self.base.timeout = timeout.into();
        self
    }

    pub fn replication_type(&self) -> ReplicationType {
        self.base.replication_type
    }

    pub fn with_replication_type(mut self, replication_type: ReplicationType) -> Self {
        self.base.replication_type = replication_type;
        self
    }

    pub fn consistency_level(&self) -> WriteConsistencyLevel {
        self.base.consistency_level
    }

    pub fn with_consistency_level(mut self, consistency_level: WriteConsistencyLevel) -> Self {
        self.base.consistency_level = consistency_level;
        self
    }
}

impl Streamable for DeleteByQueryRequest {
    fn read_from(input: &mut StreamInput) -> Result<Self> {
        let base = IndicesReplicationRequest::read_from(input)?;
        let query_source = input.read_bytes_reference()?;
        let routing = input.read_optional_string()?;
        let types = input.read_string_array()?;
        Ok(Self {
            base,
            query_source: Some(query_source),
            query_source_unsafe: false,
            types,
            routing,
        })
    }

    fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
        let source = self
            .query_source
            .as_ref()
            .ok_or_else(|| add_validation_error(QUERY_MISSING, None))?;
        self.base.write_to(out)?;
        out.write_bytes_reference(source)?;
        out.write_optional_string(self.routing.as_deref())?;
        out.write_string_array(&self.types)
    }
}

impl fmt::Display for DeleteByQueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self
            .query_source
            .as_ref()
            .and_then(|s| convert_to_json(&s.to_bytes(), false).ok())
            .unwrap_or_else(|| "_na_".to_string());
        write!(
            f,
            "[[{}]][[{}]], querySource[{}]",
            self.base.indices.join(", "),
            self.types.join(", "),
            source
        )
    }
}
