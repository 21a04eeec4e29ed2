//! Engine that prints utterances instead of playing them

use std::io::Write;

use super::{Result, SpeechEngine, Utterance};

#[derive(Debug, Default)]
pub struct ConsoleEngine;

impl SpeechEngine for ConsoleEngine {
    fn name(&self) -> &str {
        "console"
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "🔊 [{}] {}", utterance.language, utterance.text)?;
        Ok(())
    }

    fn cancel(&self) {}
}
