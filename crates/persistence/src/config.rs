use std::path::PathBuf;
use std::time::Duration;

use navedit_core::storage::REMOTE_FILE_PATH;

/// Default debounce window for auto-save.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// GitHub contents API destination.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// `None` disables remote writes; loads then report no remote data.
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Repository-relative path of the navigation file.
    pub path: String,
}

/// Persistence configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub debounce: Duration,
    /// Directory of the local [`FileStore`](crate::FileStore).
    pub storage_dir: PathBuf,
    /// Route remote saves and loads to the local save server instead of
    /// GitHub.
    pub local_mode: bool,
    pub local_api_url: String,
    /// Present when `GITHUB_OWNER` and `GITHUB_REPO` are both set.
    pub github: Option<GitHubConfig>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            storage_dir: PathBuf::from(".navedit"),
            local_mode: false,
            local_api_url: "http://localhost:4322".into(),
            github: None,
        }
    }
}

impl PersistenceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                     |
    /// |---------------------|-----------------------------|
    /// | `NAV_DEBOUNCE_MS`   | `1000`                      |
    /// | `NAV_STORAGE_DIR`   | `.navedit`                  |
    /// | `NAV_LOCAL_MODE`    | `false`                     |
    /// | `NAV_LOCAL_API_URL` | `http://localhost:4322`     |
    /// | `GITHUB_TOKEN`      | unset                       |
    /// | `GITHUB_OWNER`      | unset                       |
    /// | `GITHUB_REPO`       | unset                       |
    /// | `GITHUB_BRANCH`     | `main`                      |
    /// | `NAV_REMOTE_PATH`   | `src/data/navigation.json`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let debounce = match var("NAV_DEBOUNCE_MS") {
            Some(value) => Duration::from_millis(value.trim().parse().map_err(|_| {
                ConfigError::Invalid {
                    name: "NAV_DEBOUNCE_MS",
                    expected: "a number of milliseconds",
                    value: value.clone(),
                }
            })?),
            None => defaults.debounce,
        };

        let local_mode = match var("NAV_LOCAL_MODE") {
            Some(value) => parse_flag("NAV_LOCAL_MODE", &value)?,
            None => defaults.local_mode,
        };

        let github = match (var("GITHUB_OWNER"), var("GITHUB_REPO")) {
            (Some(owner), Some(repo)) => Some(GitHubConfig {
                token: var("GITHUB_TOKEN"),
                owner,
                repo,
                branch: var("GITHUB_BRANCH").unwrap_or_else(|| "main".into()),
                path: var("NAV_REMOTE_PATH").unwrap_or_else(|| REMOTE_FILE_PATH.into()),
            }),
            _ => None,
        };

        Ok(Self {
            debounce,
            storage_dir: var("NAV_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            local_mode,
            local_api_url: var("NAV_LOCAL_API_URL").unwrap_or(defaults.local_api_url),
            github,
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<PersistenceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PersistenceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.debounce, Duration::from_millis(1000));
        assert_eq!(config.storage_dir, PathBuf::from(".navedit"));
        assert!(!config.local_mode);
        assert!(config.github.is_none());
    }

    #[test]
    fn github_requires_owner_and_repo() {
        assert!(config(&[("GITHUB_OWNER", "acme")]).unwrap().github.is_none());

        let github = config(&[("GITHUB_OWNER", "acme"), ("GITHUB_REPO", "site")])
            .unwrap()
            .github
            .unwrap();
        assert_eq!(github.branch, "main");
        assert_eq!(github.path, REMOTE_FILE_PATH);
        assert!(github.token.is_none());
    }

    #[test]
    fn parses_overrides() {
        let config = config(&[
            ("NAV_DEBOUNCE_MS", "250"),
            ("NAV_LOCAL_MODE", "true"),
            ("NAV_LOCAL_API_URL", "http://127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert!(config.local_mode);
        assert_eq!(config.local_api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_matches!(
            config(&[("NAV_DEBOUNCE_MS", "soon")]),
            Err(ConfigError::Invalid { name: "NAV_DEBOUNCE_MS", .. })
        );
        assert_matches!(
            config(&[("NAV_LOCAL_MODE", "maybe")]),
            Err(ConfigError::Invalid { name: "NAV_LOCAL_MODE", .. })
        );
    }
}
