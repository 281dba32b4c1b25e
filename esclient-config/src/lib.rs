//! esclient configuration management using Figment
//!
//! Client settings come from three layers, later ones winning:
//!
//! - built-in defaults
//! - a configuration file, `esclient.{toml,yaml,yml,json}` in the working
//!   directory or an explicit path
//! - `ESCLIENT_` environment variables, with `__` separating nested keys
//!   (`ESCLIENT_HTTP__BASE_URL`, `ESCLIENT_THREAD_POOL__GENERIC__SIZE`)
//!
//! # Example TOML Configuration
//!
//! ```toml
//! content_type = "json"
//!
//! [http]
//! base_url = "http://search-1:9200"
//! timeout = "10s"
//!
//! [thread_pool.management]
//! type = "fixed"
//! size = 2
//! ```
//!
//! ```no_run
//! use esclient_config::load_settings;
//!
//! let settings = load_settings()?;
//! println!("cluster: {}", settings.http.base_url);
//! # Ok::<(), esclient_config::ConfigError>(())
//! ```

mod error;
mod provider;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use provider::{load_settings, ConfigProvider, CONFIG_FILE_STEM, ENV_PREFIX};
pub use types::{
    ClientSettings, ExecutorKind, ExecutorSettings, HttpSettings, LoggingSettings,
    DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, GENERIC_EXECUTOR, LISTENER_EXECUTOR,
    MANAGEMENT_EXECUTOR,
};
