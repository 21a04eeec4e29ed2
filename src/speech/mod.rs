//! Spoken output
//!
//! The timer never talks to a speech backend directly. It goes through a
//! [`Speaker`], which owns an optional [`SpeechEngine`] plus the session
//! language and the enabled flag. Engines:
//!   - [`CommandEngine`]: the host TTS command (`say`, `espeak-ng`, `spd-say`)
//!   - [`ConsoleEngine`]: prints utterances, for headless runs

mod command;
mod console;
pub mod phrases;
mod speaker;

pub use command::{CommandEngine, EngineKind};
pub use console::ConsoleEngine;
pub use phrases::Phrasebook;
pub use speaker::{select_voice, Speaker};

use std::sync::Arc;

use thiserror::Error;

use crate::config::SpeechConfig;
#[cfg(test)]
use crate::config::EngineChoice;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No text-to-speech engine is available")]
    EngineUnavailable,

    #[error("Failed to start speech command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Speech command failed: {0}")]
    Command(String),
}

pub type Result<T> = std::result::Result<T, SpeechError>;

/// A single unit of synthesized speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 style tag, e.g. `ru-RU`
    pub language: String,
    pub voice: Option<String>,
    /// Words per minute, when the engine supports it
    pub rate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub language: String,
}

impl Voice {
    pub fn new(name: &str, language: &str) -> Self {
        Self {
            name: name.to_string(),
            language: normalize_language(language),
        }
    }
}

/// Backend that turns text into audio
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Start speaking without waiting for playback to finish
    fn speak(&self, utterance: &Utterance) -> Result<()>;

    /// Stop whatever is queued or playing
    fn cancel(&self);

    fn voices(&self) -> Result<Vec<Voice>> {
        Ok(Vec::new())
    }
}

/// `en_US` and `en-us` both become `en-US`
pub fn normalize_language(tag: &str) -> String {
    let tag = tag.trim().replace('_', "-");
    match tag.split_once('-') {
        Some((lang, region)) => format!("{}-{}", lang.to_lowercase(), region.to_uppercase()),
        None => tag.to_lowercase(),
    }
}

/// Primary language subtag (`ru` for `ru-RU`)
pub fn primary_language(tag: &str) -> String {
    normalize_language(tag)
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Build the engine selected by config; `None` means speech is unavailable
pub fn engine_from_config(config: &SpeechConfig) -> Option<Arc<dyn SpeechEngine>> {
    let engine = CommandEngine::from_choice(config.engine);

    match engine {
        Some(engine) => {
            tracing::info!("Using speech engine: {}", engine.name());
            Some(Arc::new(engine))
        }
        None => {
            tracing::warn!("No text-to-speech command found, speech disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("ru-RU"), "ru-RU");
        assert_eq!(normalize_language("en_us"), "en-US");
        assert_eq!(normalize_language(" RU "), "ru");
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("ru-RU"), "ru");
        assert_eq!(primary_language("pt_BR"), "pt");
        assert_eq!(primary_language("de"), "de");
    }

    #[test]
    fn test_engine_from_config_none() {
        let config = SpeechConfig {
            engine: EngineChoice::None,
            ..Default::default()
        };
        assert!(engine_from_config(&config).is_none());
    }

    #[test]
    fn test_engine_from_config_explicit() {
        let config = SpeechConfig {
            engine: EngineChoice::EspeakNg,
            ..Default::default()
        };
        let engine = engine_from_config(&config).unwrap();
        assert_eq!(engine.name(), "espeak-ng");
    }
}
