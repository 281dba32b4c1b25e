//! Settings types

use crate::error::{ConfigError, ConfigResult};
use esclient_common::{ContentType, TimeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Default cluster address
pub const DEFAULT_BASE_URL: &str = "http://localhost:9200";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: TimeValue = TimeValue::from_secs(30);

/// Name of the executor used when no specific one applies
pub const GENERIC_EXECUTOR: &str = "generic";
/// Executor that runs response listeners
pub const LISTENER_EXECUTOR: &str = "listener";
/// Executor for administrative actions
pub const MANAGEMENT_EXECUTOR: &str = "management";

/// All settings of a client instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// How to reach the cluster
    pub http: HttpSettings,
    /// Encoding assumed for request bodies whose format cannot be detected
    pub content_type: ContentType,
    pub logging: LoggingSettings,
    /// Named executors, keyed by executor name
    pub thread_pool: BTreeMap<String, ExecutorSettings>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let mut thread_pool = BTreeMap::new();
        thread_pool.insert(
            GENERIC_EXECUTOR.to_string(),
            ExecutorSettings::cached(128, TimeValue::from_secs(30)),
        );
        thread_pool.insert(LISTENER_EXECUTOR.to_string(), ExecutorSettings::fixed(4));
        thread_pool.insert(MANAGEMENT_EXECUTOR.to_string(), ExecutorSettings::fixed(5));

        Self {
            http: HttpSettings::default(),
            content_type: ContentType::default(),
            logging: LoggingSettings::default(),
            thread_pool,
        }
    }
}

impl ClientSettings {
    /// Check values figment cannot check by type alone
    pub fn validate(&self) -> ConfigResult<()> {
        self.http.validate()?;
        for (name, executor) in &self.thread_pool {
            if executor.size == 0 {
                return Err(ConfigError::invalid_value(
                    format!("thread_pool.{name}.size"),
                    "executor size must be at least 1",
                ));
            }
        }
        Ok(())
    }

    /// Install the global tracing subscriber filtered at `logging.level`
    ///
    /// `RUST_LOG` still takes precedence. Returns `false` when a subscriber was
    /// already installed.
    pub fn init_logging(&self) -> bool {
        esclient_common::init_tracing(&self.logging.level)
    }

    /// Settings of executor `name`, if configured
    pub fn executor(&self, name: &str) -> Option<&ExecutorSettings> {
        self.thread_pool.get(name)
    }
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Cluster address, e.g. `http://localhost:9200`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: TimeValue,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("esclient/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSettings {
    /// The base URL, parsed
    pub fn url(&self) -> ConfigResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::invalid_value("http.base_url", e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::invalid_value(
                "http.base_url",
                format!("unsupported scheme: {scheme}"),
            )),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        self.url()?;
        if self.timeout.millis() == 0 {
            return Err(ConfigError::invalid_value(
                "http.timeout",
                "timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// How an executor sizes itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// At most `size` tasks run at once; the rest wait in the queue
    Fixed,
    /// Grows on demand up to `size` concurrent tasks
    Cached,
}

/// Settings of one named executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSettings {
    #[serde(rename = "type")]
    pub kind: ExecutorKind,
    pub size: usize,
    /// Waiting tasks allowed beyond `size`; unbounded when absent
    #[serde(default)]
    pub queue_size: Option<usize>,
    /// Idle time before a cached executor releases a thread
    #[serde(default)]
    pub keep_alive: Option<TimeValue>,
}

impl ExecutorSettings {
    pub fn fixed(size: usize) -> Self {
        Self {
            kind: ExecutorKind::Fixed,
            size,
            queue_size: None,
            keep_alive: None,
        }
    }

    pub fn cached(size: usize, keep_alive: TimeValue) -> Self {
        Self {
            kind: ExecutorKind::Cached,
            size,
            queue_size: None,
            keep_alive: Some(keep_alive),
        }
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = Some(queue_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ClientSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.http.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.content_type, ContentType::Json);
        assert!(settings.executor(GENERIC_EXECUTOR).is_some());
        assert!(settings.executor(MANAGEMENT_EXECUTOR).is_some());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut settings = ClientSettings::default();
        settings.http.base_url = "ftp://localhost:9200".to_string();
        let error = settings.validate().unwrap_err();
        assert!(error.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_init_logging_installs_once() {
        let settings = ClientSettings {
            logging: LoggingSettings {
                level: "debug".to_string(),
            },
            ..ClientSettings::default()
        };
        settings.init_logging();
        assert!(!settings.init_logging());
    }

    #[test]
    fn test_rejects_zero_sized_executor() {
        let mut settings = ClientSettings::default();
        settings
            .thread_pool
            .insert("search".to_string(), ExecutorSettings::fixed(0));
        let error = settings.validate().unwrap_err();
        assert!(error.to_string().contains("thread_pool.search.size"));
    }

    #[test]
    fn test_executor_settings_deserialize_type_field() {
        let executor: ExecutorSettings =
            serde_json::from_str(r#"{"type":"fixed","size":3,"queue_size":100}"#).unwrap();
        assert_eq!(executor, ExecutorSettings::fixed(3).with_queue_size(100));
    }
}
