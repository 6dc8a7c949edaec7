//! Configuration file loader

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Global: `<config dir>/toolgate/toolgate.toml`
    /// 3. Default values
    ///
    /// An absent file yields the defaults; a file with invalid values
    /// fails extraction.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        match config_path {
            Some(path) => {
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(global_path) = Self::global_config_path()
                    && global_path.exists()
                {
                    figment = figment.merge(Toml::file(&global_path));
                }
            }
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for callers that skip files)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/toolgate/toolgate.toml` if set,
    /// otherwise falls back to the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolgate").join("toolgate.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use toolgate_domain::hook::entities::FailurePolicy;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.hooks.failure_policy, FailurePolicy::Warn);
        assert_eq!(config.session.default_timeout_secs, 3600);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toolgate.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[dispatch]\nworkers = 2\n\n[hooks]\nfailure_policy = \"strict\"")
            .unwrap();

        let config = ConfigLoader::load(Some(path.as_path())).unwrap();
        assert_eq!(config.dispatch.workers, Some(2));
        assert_eq!(config.hooks.failure_policy, FailurePolicy::Strict);
        // Untouched sections keep their defaults.
        assert_eq!(config.binding.max_arguments, 50);
    }

    #[test]
    fn test_missing_explicit_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = ConfigLoader::load(Some(path.as_path())).unwrap();
        assert_eq!(config.dispatch.workers, None);
        assert_eq!(config.hooks.trust_scope, "app");
    }

    #[test]
    fn test_invalid_value_fails_extraction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toolgate.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[dispatch]\nworkers = \"many\"").unwrap();

        assert!(ConfigLoader::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("toolgate"));
    }
}
