//! Gatekeeper between the timer and the speech engine

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{normalize_language, primary_language, Phrasebook, SpeechEngine, Utterance, Voice};
use crate::config::SpeechConfig;

/// Session speech sink.
///
/// Muted until [`Speaker::enable`] is called. Every utterance cancels the
/// previous one first, so speech never overlaps. The language is fixed at
/// construction. Voices are listed once, on a background thread started by
/// `enable`; the matching voice is used from the first utterance after the
/// listing arrives.
pub struct Speaker {
    engine: Option<Arc<dyn SpeechEngine>>,
    language: String,
    preferred_voice: Option<String>,
    rate: Option<u32>,
    voice: Option<Voice>,
    voice_listing: Option<Receiver<Vec<Voice>>>,
    enabled: bool,
}

impl Speaker {
    pub fn new(engine: Option<Arc<dyn SpeechEngine>>, config: &SpeechConfig) -> Self {
        Self {
            engine,
            language: normalize_language(&config.language),
            preferred_voice: config.voice.clone(),
            rate: config.rate,
            voice: None,
            voice_listing: None,
            enabled: false,
        }
    }

    /// Speaker with no engine; every call is a no-op
    pub fn silent() -> Self {
        Self::new(None, &SpeechConfig::default())
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn phrases(&self) -> Phrasebook {
        Phrasebook::for_language(&self.language)
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_deref().map(|e| e.name())
    }

    /// Unmute and confirm audibly
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        debug!("Sound enabled (language {})", self.language);
        self.start_voice_listing();
        let confirmation = self.phrases().sound_enabled();
        self.say(&confirmation);
    }

    /// Speak `text`, interrupting anything still playing
    pub fn say(&mut self, text: &str) {
        if !self.enabled {
            return;
        }
        let Some(engine) = self.engine.clone() else {
            return;
        };

        self.poll_voice_listing();

        let utterance = Utterance {
            text: text.to_string(),
            language: self.language.clone(),
            voice: self
                .voice
                .as_ref()
                .map(|v| v.name.clone())
                .or_else(|| self.preferred_voice.clone()),
            rate: self.rate,
        };

        engine.cancel();
        if let Err(e) = engine.speak(&utterance) {
            warn!("Failed to speak '{}': {}", text, e);
        }
    }

    // Listing voices runs the engine's command, so keep it off the caller
    fn start_voice_listing(&mut self) {
        let Some(engine) = self.engine.clone() else {
            return;
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let voices = engine.voices().unwrap_or_else(|e| {
                debug!("Could not list voices from {}: {}", engine.name(), e);
                Vec::new()
            });
            let _ = tx.send(voices);
        });
        self.voice_listing = Some(rx);
    }

    fn poll_voice_listing(&mut self) {
        let Some(rx) = &self.voice_listing else {
            return;
        };
        match rx.try_recv() {
            Ok(voices) => {
                self.voice_listing = None;
                self.apply_voices(&voices);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.voice_listing = None,
        }
    }

    fn apply_voices(&mut self, voices: &[Voice]) {
        self.voice = select_voice(voices, &self.language, self.preferred_voice.as_deref());
        match &self.voice {
            Some(v) => debug!("Selected voice '{}' ({})", v.name, v.language),
            None => debug!("No voice matches {}, using engine default", self.language),
        }
    }

    #[cfg(test)]
    fn wait_for_voice_listing(&mut self) {
        if let Some(rx) = self.voice_listing.take() {
            if let Ok(voices) = rx.recv() {
                self.apply_voices(&voices);
            }
        }
    }
}

/// Pick a voice: configured name first, then exact language, then same
/// primary language
pub fn select_voice(voices: &[Voice], language: &str, preferred: Option<&str>) -> Option<Voice> {
    if let Some(name) = preferred {
        if let Some(v) = voices.iter().find(|v| v.name.eq_ignore_ascii_case(name)) {
            return Some(v.clone());
        }
    }

    let language = normalize_language(language);
    if let Some(v) = voices.iter().find(|v| v.language == language) {
        return Some(v.clone());
    }

    let primary = primary_language(&language);
    voices
        .iter()
        .find(|v| primary_language(&v.language) == primary)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{Result, SpeechError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        log: Mutex<Vec<String>>,
        voices: Vec<Voice>,
        fail_voices: bool,
        voice_calls: AtomicUsize,
    }

    impl Recorder {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl SpeechEngine for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn speak(&self, utterance: &Utterance) -> Result<()> {
            let voice = utterance.voice.clone().unwrap_or_default();
            self.log
                .lock()
                .unwrap()
                .push(format!("speak:{}:{}", voice, utterance.text));
            Ok(())
        }

        fn cancel(&self) {
            self.log.lock().unwrap().push("cancel".to_string());
        }

        fn voices(&self) -> Result<Vec<Voice>> {
            self.voice_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_voices {
                return Err(SpeechError::Command("voice listing failed".to_string()));
            }
            Ok(self.voices.clone())
        }
    }

    fn speaker_with(recorder: Arc<Recorder>) -> Speaker {
        Speaker::new(Some(recorder), &SpeechConfig::default())
    }

    #[test]
    fn test_disabled_drops_speech() {
        let recorder = Arc::new(Recorder::default());
        let mut speaker = speaker_with(recorder.clone());

        speaker.say("hello");

        assert!(!speaker.is_enabled());
        assert!(recorder.entries().is_empty());
    }

    #[test]
    fn test_enable_confirms_once() {
        let recorder = Arc::new(Recorder::default());
        let mut speaker = speaker_with(recorder.clone());

        speaker.enable();
        speaker.enable();

        assert_eq!(recorder.entries(), vec!["cancel", "speak::Звук включен"]);
    }

    #[test]
    fn test_each_utterance_cancels_previous() {
        let recorder = Arc::new(Recorder::default());
        let mut speaker = speaker_with(recorder.clone());
        speaker.enable();

        speaker.say("one");
        speaker.say("two");

        assert_eq!(
            recorder.entries()[2..],
            ["cancel", "speak::one", "cancel", "speak::two"]
        );
    }

    #[test]
    fn test_voice_selected_and_reused() {
        let recorder = Arc::new(Recorder {
            voices: vec![Voice::new("Alex", "en_US"), Voice::new("Milena", "ru_RU")],
            ..Default::default()
        });
        let mut speaker = speaker_with(recorder.clone());
        speaker.enable();
        speaker.wait_for_voice_listing();
        speaker.say("Отчет");
        speaker.say("Отчет");

        assert_eq!(speaker.voice().unwrap().name, "Milena");
        assert_eq!(recorder.entries().last().unwrap(), "speak:Milena:Отчет");
        assert_eq!(recorder.voice_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_voice_listing_is_not_retried() {
        let recorder = Arc::new(Recorder {
            fail_voices: true,
            ..Default::default()
        });
        let mut speaker = speaker_with(recorder.clone());
        speaker.enable();
        speaker.wait_for_voice_listing();

        for tick in ["10", "8", "6", "4", "2"] {
            speaker.say(tick);
        }

        assert!(speaker.voice().is_none());
        assert_eq!(recorder.voice_calls.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.entries().last().unwrap(), "speak::2");
    }

    #[test]
    fn test_empty_voice_listing_is_not_retried() {
        let recorder = Arc::new(Recorder::default());
        let mut speaker = speaker_with(recorder.clone());
        speaker.enable();
        speaker.wait_for_voice_listing();
        speaker.say("one");
        speaker.say("two");

        assert_eq!(recorder.voice_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_voice_listing_while_muted() {
        let recorder = Arc::new(Recorder::default());
        let mut speaker = speaker_with(recorder.clone());
        speaker.say("muted");
        assert_eq!(recorder.voice_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_silent_speaker() {
        let mut speaker = Speaker::silent();
        speaker.enable();
        speaker.say("nothing happens");
        assert!(speaker.is_enabled());
        assert!(!speaker.is_available());
        assert!(speaker.engine_name().is_none());
    }

    #[test]
    fn test_select_voice_preference_order() {
        let voices = vec![
            Voice::new("Yuri", "ru_RU"),
            Voice::new("Milena", "ru_RU"),
            Voice::new("ru", "ru"),
        ];
        assert_eq!(
            select_voice(&voices, "ru-RU", Some("milena")).unwrap().name,
            "Milena"
        );
        assert_eq!(select_voice(&voices, "ru-RU", None).unwrap().name, "Yuri");
        assert_eq!(
            select_voice(&voices, "ru-UA", Some("missing")).unwrap().name,
            "Yuri"
        );
        assert!(select_voice(&voices, "de-DE", None).is_none());
    }
}
