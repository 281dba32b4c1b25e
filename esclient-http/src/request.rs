//! The HTTP call an action builds and the raw response it gets back

use bytes::Bytes;
use esclient_common::xcontent::convert_to_map;
use esclient_common::{ContentType, Result};
use esclient_config::ClientSettings;
use reqwest::Method;
use serde_json::{Map, Value};
use std::fmt::Display;

/// A REST call against the cluster, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    method: Method,
    endpoint: String,
    params: Vec<(String, String)>,
    body: Option<Bytes>,
    content_type: ContentType,
}

impl HttpRequest {
    pub fn new(settings: &ClientSettings, method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Vec::new(),
            body: None,
            content_type: settings.content_type,
        }
    }

    /// Add query parameter `name`; `None` leaves it out of the query string
    pub fn param<V: Display>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.params.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Add query parameter `name` as a comma separated list; empty leaves it out
    pub fn param_list<S: AsRef<str>>(mut self, name: &str, values: &[S]) -> Self {
        if !values.is_empty() {
            let joined = values
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(",");
            self.params.push((name.to_string(), joined));
        }
        self
    }

    /// Attach `body`, labelled with the encoding detected from its bytes
    ///
    /// Bodies whose encoding cannot be detected keep the configured default.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        if let Some(detected) = ContentType::detect(&body) {
            self.content_type = detected;
        }
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of query parameter `name`, if set
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Encoding of the body
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}

/// A successful response from the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The body parsed as a structured document
    pub fn body_as_map(&self) -> Result<Map<String, Value>> {
        convert_to_map(&self.body).map(|(_, map)| map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esclient_common::TimeValue;

    #[test]
    fn test_absent_params_are_omitted() {
        let settings = ClientSettings::default();
        let request = HttpRequest::new(&settings, Method::POST, "/_test")
            .param_list::<String>("nodeId", &[])
            .param::<TimeValue>("delay", None)
            .param("timeout", Some(TimeValue::from_secs(5)));

        assert_eq!(
            request.params(),
            &[("timeout".to_string(), "5s".to_string())]
        );
        assert!(request.param_value("delay").is_none());
        assert!(request.param_value("nodeId").is_none());
    }

    #[test]
    fn test_list_params_are_comma_joined() {
        let settings = ClientSettings::default();
        let request =
            HttpRequest::new(&settings, Method::POST, "/_test").param_list("nodeId", &["a", "b"]);
        assert_eq!(request.param_value("nodeId"), Some("a,b"));
    }

    #[test]
    fn test_body_uses_configured_content_type() {
        let settings = ClientSettings {
            content_type: ContentType::Yaml,
            ..ClientSettings::default()
        };
        let request = HttpRequest::new(&settings, Method::DELETE, "/_query").body("---\n{}");
        assert_eq!(request.content_type(), ContentType::Yaml);
        assert_eq!(request.payload().unwrap().as_ref(), b"---\n{}");
    }

    #[test]
    fn test_json_body_is_labelled_json_under_yaml_settings() {
        let settings = ClientSettings {
            content_type: ContentType::Yaml,
            ..ClientSettings::default()
        };
        let request =
            HttpRequest::new(&settings, Method::DELETE, "/_query").body(r#"{"match_all":{}}"#);
        assert_eq!(request.content_type(), ContentType::Json);
    }

    #[test]
    fn test_undetectable_body_keeps_configured_content_type() {
        let settings = ClientSettings {
            content_type: ContentType::Yaml,
            ..ClientSettings::default()
        };
        let request = HttpRequest::new(&settings, Method::DELETE, "/_query").body("match_all: {}");
        assert_eq!(request.content_type(), ContentType::Yaml);
    }

    #[test]
    fn test_malformed_body_is_a_decoding_error() {
        let response = HttpResponse::new(200, "not a document");
        assert!(matches!(
            response.body_as_map().unwrap_err(),
            esclient_common::EsClientError::Decode { .. }
        ));
    }
}
