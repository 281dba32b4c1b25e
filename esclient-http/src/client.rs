//! Entry points for sending actions to a cluster

use crate::action::execute;
use crate::delete_by_query::DeleteByQueryAction;
use crate::nodes_restart::{NodesRestartAction, NodesRestartRequest, NodesRestartResponse};
use crate::transport::{HttpTransport, Transport};
use esclient_common::Result;
use esclient_config::ClientSettings;
use esclient_search::{DeleteByQueryRequest, DeleteByQueryResponse};
use std::sync::Arc;
use tracing::instrument;

/// Entry point for talking to a cluster
#[derive(Clone)]
pub struct Client {
    settings: Arc<ClientSettings>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// A client sending over HTTP to the configured cluster
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let transport = HttpTransport::new(&settings.http)?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(settings: ClientSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Cluster administration calls sharing this client's settings and transport
    pub fn admin(&self) -> ClusterAdminClient {
        ClusterAdminClient {
            settings: Arc::clone(&self.settings),
            transport: Arc::clone(&self.transport),
        }
    }

    #[instrument(skip(self, request), fields(indices = ?request.indices()))]
    pub async fn delete_by_query(
        &self,
        request: DeleteByQueryRequest,
    ) -> Result<DeleteByQueryResponse> {
        execute(
            &DeleteByQueryAction,
            self.transport.as_ref(),
            &self.settings,
            request,
        )
        .await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.settings.http.base_url)
            .finish_non_exhaustive()
    }
}

/// Cluster administration calls
#[derive(Clone)]
pub struct ClusterAdminClient {
    settings: Arc<ClientSettings>,
    transport: Arc<dyn Transport>,
}

impl ClusterAdminClient {
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Restart nodes; an accepted restart yields `Ok(None)`
    #[instrument(skip(self, request), fields(nodes = ?request.node_ids()))]
    pub async fn nodes_restart(
        &self,
        request: NodesRestartRequest,
    ) -> Result<Option<NodesRestartResponse>> {
        execute(
            &NodesRestartAction,
            self.transport.as_ref(),
            &self.settings,
            request,
        )
        .await
    }
}
