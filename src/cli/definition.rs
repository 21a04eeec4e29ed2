//! Command-line definition

use clap::{Parser, Subcommand};

use super::run::RunArgs;
use super::speech::SpeechCommands;
use crate::config::{Config, EngineChoice};
use crate::timer::RestartPolicy;

#[derive(Parser)]
#[command(name = "vtimer")]
#[command(about = "Task timer with spoken reminders", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Start with the dark theme
    #[arg(long, global = true)]
    pub dark: bool,

    /// Speech engine to use
    #[arg(long, global = true, value_enum, env = "VOICE_TIMER_ENGINE")]
    pub engine: Option<EngineChoice>,

    /// Spoken language tag, e.g. ru-RU or en-US
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Preferred voice name
    #[arg(long, global = true)]
    pub voice: Option<String>,

    /// What starting timers does to a task that is already counting down
    #[arg(long, global = true, value_enum)]
    pub restart: Option<RestartPolicy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run tasks headless and exit when all countdowns finish
    Run(RunArgs),

    /// Inspect and test text-to-speech
    Speech {
        #[command(subcommand)]
        command: SpeechCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// Flags given on the command line win over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.dark {
            config.ui.dark_mode = true;
        }
        if let Some(engine) = self.engine {
            config.speech.engine = engine;
        }
        if let Some(language) = &self.language {
            config.speech.language = language.clone();
        }
        if let Some(voice) = &self.voice {
            config.speech.voice = Some(voice.clone());
        }
        if let Some(restart) = self.restart {
            config.timer.restart = restart;
        }
    }
}
