use crate::theme::ThemeMode;
use anyhow::{Context, Result};
use keybed_sampler::SampleManifest;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration (read-only, never written back)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the piano samples are fetched from (URL or local directory)
    pub base_url: String,
    /// Release time in seconds
    pub release: f32,
    pub theme: ThemeMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: SampleManifest::SALAMANDER_BASE_URL.to_string(),
            release: SampleManifest::DEFAULT_RELEASE,
            theme: ThemeMode::System,
        }
    }
}

impl AppConfig {
    /// Load config from `path`, or the standard location when `None`
    ///
    /// Returns the default config if the file doesn't exist or is malformed.
    pub fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {:#}", e);
                log::warn!("Using default configuration");
                Self::default()
            }
        }
    }

    fn try_load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                log::warn!("Config file {} not found", config_path.display());
            }
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        log::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp values that would break playback
    pub fn sanitized(mut self) -> Self {
        if !self.release.is_finite() || self.release < 0.0 {
            log::warn!("Invalid release time {}, using default", self.release);
            self.release = SampleManifest::DEFAULT_RELEASE;
        }
        if self.base_url.trim().is_empty() {
            self.base_url = SampleManifest::SALAMANDER_BASE_URL.to_string();
        }
        self
    }

    /// Cross-platform config file path
    pub fn config_path() -> Result<PathBuf> {
        use directories::ProjectDirs;

        let proj_dirs = ProjectDirs::from("", "", "keybed")
            .context("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn manifest(&self) -> SampleManifest {
        SampleManifest::salamander()
            .with_base_url(self.base_url.clone())
            .with_release(self.release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://tonejs.github.io/audio/salamander/");
        assert_eq!(config.release, 1.0);
        assert_eq!(config.theme, ThemeMode::System);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "theme": "dark" }"#).unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.release, 1.0);
    }

    #[test]
    fn test_negative_release_is_replaced() {
        let config = AppConfig::from_json(r#"{ "release": -2.0 }"#).unwrap();
        assert_eq!(config.release, 1.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(AppConfig::from_json("{ release: ").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/keybed/config.json")));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_manifest_uses_overrides() {
        let config = AppConfig {
            base_url: "/srv/piano".to_string(),
            release: 0.5,
            theme: ThemeMode::Light,
        };
        let manifest = config.manifest();
        assert_eq!(manifest.base_url, "/srv/piano");
        assert_eq!(manifest.release, 0.5);
        assert_eq!(manifest.sampler_options().release, 0.5);
    }
}
