use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("repo-issues").join("config.toml"))
}

impl Config {
    /// Load `~/.config/repo-issues/config.toml`, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Config::default()
            }
        }
    }

    /// Command line override for the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
[api]
base_url = "https://github.example.com/api/v3"
token_env = "GHE_TOKEN"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://github.example.com/api/v3");
        assert_eq!(config.api.token_env.as_deref(), Some("GHE_TOKEN"));
        // Unset keys keep their defaults
        assert_eq!(config.api.token_command.as_deref(), Some("gh auth token"));
    }

    #[test]
    fn parse_empty_config_uses_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_file_uses_default() {
        let config = Config::load_from(Path::new("/nonexistent/repo-issues/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_uses_default() {
        let path = std::env::temp_dir().join(format!(
            "repo-issues-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api]\nbase_url = 42\n").unwrap();
        let config = Config::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn base_url_override() {
        let config = Config::default().with_base_url(Some("http://localhost:8080".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:8080");

        let config = Config::default().with_base_url(None);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }
}
