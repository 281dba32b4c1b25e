//! # esclient common
//!
//! Foundational pieces shared by every esclient crate.
//!
//! ## Modules
//!
//! - [`error`] - the client error type, severities and request validation errors
//! - [`io`] - the binary stream codec used for request envelopes
//! - [`bytes_reference`] - owned and shared byte payloads
//! - [`time_value`] - millisecond durations in the cluster's textual format
//! - [`xcontent`] - JSON/YAML structured content
//! - [`logging`] - tracing helpers

pub mod bytes_reference;
pub mod error;
pub mod io;
pub mod logging;
pub mod time_value;
pub mod xcontent;

pub use bytes_reference::{BytesReference, SharedBuffer};
pub use error::{
    add_validation_error, ActionRequestValidationError, ErrorSeverity, EsClientError, Result,
    Severity,
};
pub use io::{StreamInput, StreamOutput, Streamable};
pub use logging::{init_tracing, Pretty};
pub use time_value::TimeValue;
pub use xcontent::{ContentType, XContentBuilder, CONTENT_TYPE, INDEX_CONTENT_TYPE};
