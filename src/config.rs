// src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base every relative image link is resolved against.
    pub server_url: String,
    /// Glob patterns (matched against lowercased file names) that count as images.
    pub image_patterns: Vec<String>,
    pub log_level: String,
    pub accent_color: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080/".to_string(),
            image_patterns: ["*.jpg", "*.jpeg", "*.png", "*.gif", "*.webp"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            log_level: "info".to_string(),
            accent_color: "#5b8def".to_string(),
        }
    }
}

impl AppConfig {
    pub fn server(&self) -> Result<Url> {
        Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL: {}", self.server_url))
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "GalleryUploader", "gallery-uploader")
        .context("Failed to get project directories")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Loads the config, writing the defaults out first if there is no file yet
/// so users have something to edit.
pub fn load_or_init_config(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        return load_config(config_path);
    }
    let config = AppConfig::default();
    save_config(&config, config_path)?;
    Ok(config)
}

pub fn save_config(config: &AppConfig, config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(config_path, contents)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    Ok(())
}
