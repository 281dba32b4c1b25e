//! Delivering requests to the cluster
//!
//! [`Transport`] is the seam between actions and the network. [`HttpTransport`]
//! implements it with reqwest; tests and embedders can supply their own.

use crate::request::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use esclient_common::{EsClientError, Result};
use esclient_config::HttpSettings;
use reqwest::{header, Client};
use tracing::{debug, error, info, instrument};
use url::Url;

/// Submits one request and returns its single response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Non-success statuses are returned as [`EsClientError::HttpStatus`]
    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Transport over HTTP using reqwest
///
/// Requests are sent once; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport for the configured cluster address, timeout and user agent
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let base_url = settings
            .url()
            .map_err(|e| EsClientError::transport(e.to_string()))?;
        let client = Client::builder()
            .timeout(settings.timeout.as_duration())
            .user_agent(&settings.user_agent)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `request`, keeping any path prefix of the base URL
    pub fn url_for(&self, request: &HttpRequest) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        let endpoint = request.endpoint().trim_start_matches('/');
        url.set_path(&format!("{prefix}/{endpoint}"));
        if !request.params().is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.params().iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = request.endpoint()))]
    async fn submit(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url_for(&request);
        debug!(%url, "submitting request");

        let mut builder = self.client.request(request.method().clone(), url);
        if let Some(body) = request.payload() {
            builder = builder
                .header(header::CONTENT_TYPE, request.content_type().media_type())
                .body(body.clone());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            error!(status = status.as_u16(), "request failed");
            return Err(EsClientError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        info!(status = status.as_u16(), len = body.len(), "request succeeded");
        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> EsClientError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };
    EsClientError::transport(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esclient_config::ClientSettings;
    use reqwest::Method;

    fn transport(base_url: &str) -> HttpTransport {
        let settings = HttpSettings {
            base_url: base_url.to_string(),
            ..HttpSettings::default()
        };
        HttpTransport::new(&settings).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let settings = ClientSettings::default();
        let request = HttpRequest::new(&settings, Method::POST, "/_cluster/nodes/_restart")
            .param("delay", Some("10s"));

        let url = transport("http://proxy:8080/es/").url_for(&request);
        assert_eq!(
            url.as_str(),
            "http://proxy:8080/es/_cluster/nodes/_restart?delay=10s"
        );
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let settings = ClientSettings::default();
        let request = HttpRequest::new(&settings, Method::DELETE, "/logs/_query");

        let url = transport("http://localhost:9200").url_for(&request);
        assert_eq!(url.as_str(), "http://localhost:9200/logs/_query");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let settings = HttpSettings {
            base_url: "ftp://cluster".to_string(),
            ..HttpSettings::default()
        };
        assert!(matches!(
            HttpTransport::new(&settings).unwrap_err(),
            EsClientError::Transport { .. }
        ));
    }
}
