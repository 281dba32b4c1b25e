//! Configuration provider using Figment

use crate::error::{ConfigError, ConfigResult};
use crate::types::ClientSettings;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "ESCLIENT_";

/// File stem looked up in the search directory
pub const CONFIG_FILE_STEM: &str = "esclient";

const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Loads [`ClientSettings`] from all configured sources
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. The configuration file (explicit path, or the first `esclient.*` found in
///    the search directory)
/// 3. Environment variables with the `ESCLIENT_` prefix, `__` separating nested keys
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    file: Option<PathBuf>,
    search_dir: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigProvider {
    /// Provider that searches the current directory
    pub fn new() -> Self {
        Self {
            file: None,
            search_dir: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Load exactly this file; it must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Look for `esclient.*` in `dir` instead of the current directory
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate settings
    pub fn load(&self) -> ConfigResult<ClientSettings> {
        debug!("Loading client settings");

        let settings: ClientSettings = self.build_figment()?.extract()?;
        settings.validate()?;

        info!(
            base_url = %settings.http.base_url,
            executors = settings.thread_pool.len(),
            "Loaded client settings"
        );
        Ok(settings)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ClientSettings::default()));

        if let Some(path) = self.config_file()? {
            trace!("Loading config file: {}", path.display());
            figment = figment.merge(Self::load_config_file(&path)?);
        }

        trace!("Loading environment variables with prefix {}", self.env_prefix);
        Ok(figment.merge(Env::prefixed(&self.env_prefix).split("__")))
    }

    fn config_file(&self) -> ConfigResult<Option<PathBuf>> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            return Ok(Some(path.clone()));
        }

        let dir = match &self.search_dir {
            Some(dir) => dir.clone(),
            None => match std::env::current_dir() {
                Ok(dir) => dir,
                Err(_) => return Ok(None),
            },
        };
        Ok(Self::discover_config_file(&dir))
    }

    /// First `esclient.{toml,yaml,yml,json}` in `dir`
    pub fn discover_config_file(dir: &Path) -> Option<PathBuf> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
            .find(|path| path.is_file())
    }

    fn load_config_file(path: &Path) -> ConfigResult<Figment> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Ok(Figment::from(Toml::file(path))),
            "yaml" | "yml" => Ok(Figment::from(Yaml::file(path))),
            "json" => Ok(Figment::from(Json::file(path))),
            other => Err(ConfigError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Load settings from the current directory and the environment
pub fn load_settings() -> ConfigResult<ClientSettings> {
    ConfigProvider::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_prefers_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("esclient.json"), "{}").unwrap();
        fs::write(dir.path().join("esclient.toml"), "").unwrap();

        let found = ConfigProvider::discover_config_file(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "esclient.toml");
    }

    #[test]
    fn test_discover_nothing_in_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigProvider::discover_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let provider = ConfigProvider::new().with_file(dir.path().join("nope.toml"));
        assert!(matches!(
            provider.load(),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, "a=b").unwrap();

        let provider = ConfigProvider::new().with_file(path);
        assert!(matches!(
            provider.load(),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }
}
