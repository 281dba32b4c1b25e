//! Deleting documents by query over HTTP

use crate::action::HttpAction;
use crate::request::{HttpRequest, HttpResponse};
use esclient_common::{add_validation_error, EsClientError, Result};
use esclient_config::ClientSettings;
use esclient_search::{DeleteByQueryRequest, DeleteByQueryResponse, QUERY_MISSING};
use reqwest::Method;
use serde_json::Value;

/// Comma joined names, or `_all` when there are none
fn format_multi(names: &[String]) -> String {
    if names.is_empty() {
        "_all".to_string()
    } else {
        names.join(",")
    }
}

/// `/{indices}/{types}/_query`, leaving out the type segment when no types are set
pub fn endpoint(indices: &[String], types: &[String]) -> String {
    let mut path = format!("/{}", format_multi(indices));
    if !types.is_empty() {
        path.push('/');
        path.push_str(&types.join(","));
    }
    path.push_str("/_query");
    path
}

/// `DELETE /{indices}/{types}/_query`
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteByQueryAction;

impl HttpAction for DeleteByQueryAction {
    type Request = DeleteByQueryRequest;
    type Response = DeleteByQueryResponse;

    const NAME: &'static str = "delete_by_query";

    fn build_request(
        &self,
        settings: &ClientSettings,
        mut request: DeleteByQueryRequest,
    ) -> Result<HttpRequest> {
        if let Some(validation) = request.validate() {
            return Err(validation.into());
        }
        let source = request
            .query_source()
            .map(|source| source.to_bytes())
            .ok_or_else(|| add_validation_error(QUERY_MISSING, None))?;

        Ok(HttpRequest::new(
            settings,
            Method::DELETE,
            endpoint(request.indices(), request.types()),
        )
        .param("routing", request.routing())
        .param("timeout", Some(request.timeout()))
        .param("replication", request.replication_type().param_value())
        .param("consistency", request.consistency_level().param_value())
        .body(source))
    }

    fn to_response(&self, response: HttpResponse) -> Result<DeleteByQueryResponse> {
        let map = response.body_as_map()?;
        serde_json::from_value(Value::Object(map)).map_err(|error| {
            EsClientError::decode(format!("unexpected delete by query response: {error}"))
        })
    }
}
