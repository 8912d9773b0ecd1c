use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Page the scenario starts from
    pub target_url: String,

    /// Browser executable; discovered on the system when unset
    pub driver_path: Option<PathBuf>,

    /// Files attached to the new card
    pub upload_files: Vec<PathBuf>,

    /// Persistent run log
    pub log_file: PathBuf,

    /// Reports and failure screenshots
    pub output_dir: PathBuf,

    /// Timeout for element waiting (ms)
    pub default_timeout_ms: u64,

    /// Pause after page navigations (ms)
    pub settle_delay_ms: u64,

    pub headless: bool,

    /// chromium, firefox or webkit
    pub browser: String,

    /// Existing cards put through the modify flow
    pub cards_to_modify: usize,

    /// Link attempts
    pub max_links: usize,

    /// Screenshot on each failed step
    pub snapshot: bool,

    /// Write JSON and JUnit reports
    pub report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:5173/".to_string(),
            driver_path: None,
            upload_files: Vec::new(),
            log_file: PathBuf::from("scenario.log"),
            output_dir: PathBuf::from("./output"),
            default_timeout_ms: 10_000,
            settle_delay_ms: 1_000,
            headless: false,
            browser: "chromium".to_string(),
            cards_to_modify: 2,
            max_links: 3,
            snapshot: false,
            report: false,
        }
    }
}

impl Config {
    /// Load from a YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_yaml_str(&content)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse YAML content")
    }

    /// Apply `KIRUNA_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("KIRUNA_TARGET_URL").filter(|v| !v.is_empty()) {
            self.target_url = url;
        }
        if let Some(path) = lookup("KIRUNA_DRIVER_PATH").filter(|v| !v.is_empty()) {
            self.driver_path = Some(PathBuf::from(path));
        }
        if let Some(headless) = lookup("KIRUNA_HEADLESS") {
            self.headless = headless == "true" || headless == "1";
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str(
            "targetUrl: http://app.test:8080/\nuploadFiles:\n  - docs/a.pdf\n  - docs/b.pdf\nmaxLinks: 1\n",
        )
        .unwrap();

        assert_eq!(config.target_url, "http://app.test:8080/");
        assert_eq!(config.upload_files.len(), 2);
        assert_eq!(config.max_links, 1);
        assert_eq!(config.cards_to_modify, 2);
        assert_eq!(config.default_timeout_ms, 10_000);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(Config::from_yaml_str("maxLinks: many").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("KIRUNA_TARGET_URL", "http://ci:5173/"),
            ("KIRUNA_DRIVER_PATH", "/opt/chrome/chrome"),
            ("KIRUNA_HEADLESS", "1"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.target_url, "http://ci:5173/");
        assert_eq!(config.driver_path, Some(PathBuf::from("/opt/chrome/chrome")));
        assert!(config.headless);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiruna.yaml");
        std::fs::write(&path, "headless: true\nsnapshot: true\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert!(config.snapshot);
    }
}
