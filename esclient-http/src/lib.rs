//! # esclient http
//!
//! Typed actions sent to a cluster over HTTP.
//!
//! Each action implements [`HttpAction`]: it maps its request onto an
//! [`HttpRequest`] (method, endpoint, query parameters, body) and turns the
//! [`HttpResponse`] back into a typed result. [`execute`] runs any action over a
//! [`Transport`]; [`HttpTransport`] is the reqwest implementation.
//!
//! ```no_run
//! use esclient_common::TimeValue;
//! use esclient_config::ClientSettings;
//! use esclient_http::{Client, NodesRestartRequest};
//!
//! # async fn run() -> esclient_common::Result<()> {
//! let settings = ClientSettings::default();
//! settings.init_logging();
//! let client = Client::new(settings)?;
//! let request = NodesRestartRequest::new(["node-1"]).with_delay(TimeValue::from_secs(5));
//! assert!(client.admin().nodes_restart(request).await?.is_none());
//! # Ok(())
//! # }
//! ```

mod action;
mod client;
pub mod delete_by_query;
mod nodes_restart;
mod request;
mod transport;

pub use action::{execute, HttpAction};
pub use client::{Client, ClusterAdminClient};
pub use delete_by_query::DeleteByQueryAction;
pub use nodes_restart::{NodesRestartAction, NodesRestartRequest, NodesRestartResponse};
pub use request::{HttpRequest, HttpResponse};
pub use transport::{HttpTransport, Transport};
