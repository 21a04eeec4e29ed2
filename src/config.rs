//! User configuration management
//!
//! Stored as `config.toml` in the app directory:
//!   - Linux: ~/.config/voice-timer/
//!   - macOS and others: ~/.voice-timer/

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::timer::RestartPolicy;

pub const APP_NAME: &str = "voice-timer";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Spoken language for the whole session
    #[serde(default = "default_language")]
    pub language: String,

    /// Voice name to prefer over language matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    #[serde(default)]
    pub engine: EngineChoice,

    /// Words per minute, for engines that accept a rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<u32>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            voice: None,
            engine: EngineChoice::default(),
            rate: None,
        }
    }
}

fn default_language() -> String {
    "ru-RU".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EngineChoice {
    /// Use the first speech command found on this platform
    #[default]
    Auto,
    Say,
    EspeakNg,
    SpdSay,
    /// No speech at all
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub restart: RestartPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub dark_mode: bool,
}

pub fn get_app_dir() -> Result<PathBuf> {
    let dir = if cfg!(target_os = "linux") {
        dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join(APP_NAME)
    } else {
        dirs::home_dir()
            .ok_or_else(|| anyhow!("Cannot determine home directory"))?
            .join(format!(".{}", APP_NAME))
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config)?;
    fs::write(&path, content)?;
    Ok(())
}
