use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from ~/.config/m4bmerge/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Where finished books go
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output directory (falls back to ./output)
    pub dir: Option<PathBuf>,

    /// Nest output under author/series/album directories
    #[serde(default)]
    pub organize: bool,

    /// Parent of the per-run scratch directory (system temp dir when unset)
    pub scratch_dir: Option<PathBuf>,
}

/// Encoder settings for the final AAC stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub codec: String,
    pub sample_rate: u32,
    pub threads: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: "libfdk_aac".to_string(),
            sample_rate: 44100,
            threads: 4,
        }
    }
}

/// Names (or paths) of the external binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub mp3wrap: String,
    pub mp4box: String,
    pub mp4chaps: String,
    pub mp4art: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            mp3wrap: "mp3wrap".to_string(),
            mp4box: "MP4Box".to_string(),
            mp4chaps: "mp4chaps".to_string(),
            mp4art: "mp4art".to_string(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

impl Config {
    /// Load configuration from the default path (~/.config/m4bmerge/config.toml)
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("m4bmerge").join("config.toml"))
    }

    /// Get the output directory, with CLI override taking precedence
    pub fn output_dir(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        cli_override
            .cloned()
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(default_output_dir)
    }

    /// Organized tree mode is on if either the CLI flag or the config asks for it
    pub fn organize(&self, cli_flag: bool) -> bool {
        cli_flag || self.output.organize
    }
}
