//! Restarting cluster nodes

use crate::action::HttpAction;
use crate::request::{HttpRequest, HttpResponse};
use esclient_common::{Pretty, Result, TimeValue};
use esclient_config::ClientSettings;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

const ENDPOINT: &str = "/_cluster/nodes/_restart";

/// Restart some or all nodes of the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodesRestartRequest {
    node_ids: Vec<String>,
    delay: Option<TimeValue>,
    timeout: Option<TimeValue>,
}

impl NodesRestartRequest {
    /// Restart the given nodes; none means every node
    pub fn new<I, S>(node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            node_ids: node_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    /// How long each node waits before restarting
    pub fn delay(&self) -> Option<TimeValue> {
        self.delay
    }

    pub fn with_delay(mut self, delay: impl Into<TimeValue>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn timeout(&self) -> Option<TimeValue> {
        self.timeout
    }

    pub fn with_timeout(mut self, timeout: impl Into<TimeValue>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// Per-node restart outcome
///
/// The restart action accepts the call without a structured result, so
/// executing it yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesRestartResponse {
    pub cluster_name: String,
    pub nodes: Vec<String>,
}

/// `POST /_cluster/nodes/_restart`
#[derive(Debug, Clone, Copy, Default)]
pub struct NodesRestartAction;

impl HttpAction for NodesRestartAction {
    type Request = NodesRestartRequest;
    type Response = Option<NodesRestartResponse>;

    const NAME: &'static str = "cluster_nodes_restart";

    fn build_request(
        &self,
        settings: &ClientSettings,
        request: NodesRestartRequest,
    ) -> Result<HttpRequest> {
        Ok(HttpRequest::new(settings, Method::POST, ENDPOINT)
            .param_list("nodeId", request.node_ids())
            .param("delay", request.delay())
            .param("timeout", request.timeout()))
    }

    fn to_response(&self, response: HttpResponse) -> Result<Option<NodesRestartResponse>> {
        let map = response.body_as_map()?;
        info!("response = {}", Pretty(&map));
        Ok(None)
    }
}
