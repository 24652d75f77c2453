use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("spark")
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("spark")
        .join("config.json")
}

/// Settings for the generative-text service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AiConfig {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key_env: "API_KEY".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SparkConfig {
    pub data_directory: PathBuf,
    pub debug_logging: bool,
    pub ai: AiConfig,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            debug_logging: false,
            ai: AiConfig::default(),
        }
    }
}

impl SparkConfig {
    /// Load from the default location under the user's config directory.
    pub fn load_default() -> Self {
        Self::load(&default_config_path())
    }

    /// Load from `path`, falling back to defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No config at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    /// The AI key from the configured environment variable; empty counts as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.ai.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SparkConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config, SparkConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"debug_logging": true, "ai": {"model": "gemini-pro"}}"#).unwrap();

        let config = SparkConfig::load(&path);
        assert!(config.debug_logging);
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.ai.api_key_env, "API_KEY");
        assert_eq!(config.data_directory, default_data_dir());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SparkConfig::load(&path), SparkConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = SparkConfig::default();
        config.data_directory = dir.path().join("data");
        config.save(&path).unwrap();
        assert_eq!(SparkConfig::load(&path), config);
    }

    #[test]
    fn empty_api_key_counts_as_absent() {
        let mut config = SparkConfig::default();
        config.ai.api_key_env = "SPARK_TEST_EMPTY_KEY".into();
        // SAFETY: only this test touches this variable.
        unsafe { std::env::set_var("SPARK_TEST_EMPTY_KEY", "  ") };
        assert_eq!(config.api_key(), None);
        unsafe { std::env::set_var("SPARK_TEST_EMPTY_KEY", "abc") };
        assert_eq!(config.api_key().as_deref(), Some("abc"));
    }
}
