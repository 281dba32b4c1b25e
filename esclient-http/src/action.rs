//! Typed actions executed over a [`Transport`]

use crate::request::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use esclient_common::Result;
use esclient_config::ClientSettings;
use tracing::debug;

/// Maps a typed request onto an HTTP call and the response back to a typed result
pub trait HttpAction: Send + Sync {
    type Request: Send;
    type Response: Send;

    /// Name used in logs
    const NAME: &'static str;

    /// Build the HTTP call for `request`
    ///
    /// Fails before anything is sent when the request does not validate.
    fn build_request(
        &self,
        settings: &ClientSettings,
        request: Self::Request,
    ) -> Result<HttpRequest>;

    /// Translate a successful response
    fn to_response(&self, response: HttpResponse) -> Result<Self::Response>;
}

/// Build, submit and translate one request
pub async fn execute<A: HttpAction>(
    action: &A,
    transport: &dyn Transport,
    settings: &ClientSettings,
    request: A::Request,
) -> Result<A::Response> {
    let http_request = action.build_request(settings, request)?;
    debug!(
        action = A::NAME,
        method = %http_request.method(),
        endpoint = http_request.endpoint(),
        "executing action"
    );
    let response = transport.submit(http_request).await?;
    action.to_response(response)
}
