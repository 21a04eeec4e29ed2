//! Text-to-speech through the host's speech command
//!
//!   - macOS: `say`
//!   - Linux: `espeak-ng`, falling back to `spd-say` (speech-dispatcher)
//!
//! Speak and cancel requests are queued to one worker thread per engine, so
//! the caller never waits on a child process and requests run in order.

use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::EngineChoice;

use super::{primary_language, Result, SpeechEngine, SpeechError, Utterance, Voice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Say,
    EspeakNg,
    SpdSay,
}

impl EngineKind {
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::EspeakNg => "espeak-ng",
            Self::SpdSay => "spd-say",
        }
    }

    /// Candidates for this platform, most preferred first
    fn platform_candidates() -> &'static [EngineKind] {
        if cfg!(target_os = "macos") {
            &[EngineKind::Say]
        } else {
            &[EngineKind::EspeakNg, EngineKind::SpdSay]
        }
    }

    /// Arguments passed to the speech command for one utterance
    fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            Self::Say => {
                if let Some(voice) = &utterance.voice {
                    args.extend(["-v".to_string(), voice.clone()]);
                }
                if let Some(rate) = utterance.rate {
                    args.extend(["-r".to_string(), rate.to_string()]);
                }
            }
            Self::EspeakNg => {
                let voice = utterance
                    .voice
                    .clone()
                    .unwrap_or_else(|| primary_language(&utterance.language));
                args.extend(["-v".to_string(), voice]);
                if let Some(rate) = utterance.rate {
                    args.extend(["-s".to_string(), rate.to_string()]);
                }
            }
            Self::SpdSay => {
                // -w keeps the child alive until playback ends
                args.extend([
                    "-w".to_string(),
                    "-l".to_string(),
                    primary_language(&utterance.language),
                ]);
                if let Some(voice) = &utterance.voice {
                    args.extend(["-y".to_string(), voice.clone()]);
                }
            }
        }
        if *self != Self::Say {
            args.push("--".to_string());
        }
        args.push(utterance.text.clone());
        args
    }

    fn command(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(self.binary());
        cmd.args(self.speak_args(utterance)).stdin(Stdio::null());
        cmd
    }
}

enum Job {
    Speak(Utterance),
    Cancel,
}

pub struct CommandEngine {
    kind: EngineKind,
    jobs: OnceLock<Sender<Job>>,
}

impl CommandEngine {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            jobs: OnceLock::new(),
        }
    }

    /// First installed speech command for this platform
    pub fn detect() -> Option<Self> {
        EngineKind::platform_candidates()
            .iter()
            .find(|kind| is_installed(kind.binary()))
            .map(|kind| Self::new(*kind))
    }

    /// Engine for a configured choice; `None` when speech is off or nothing
    /// is installed
    pub fn from_choice(choice: EngineChoice) -> Option<Self> {
        match choice {
            EngineChoice::None => None,
            EngineChoice::Auto => Self::detect(),
            EngineChoice::Say => Some(Self::new(EngineKind::Say)),
            EngineChoice::EspeakNg => Some(Self::new(EngineKind::EspeakNg)),
            EngineChoice::SpdSay => Some(Self::new(EngineKind::SpdSay)),
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        self.kind.speak_args(utterance)
    }

    /// Speak and wait for playback to finish
    pub fn speak_blocking(&self, utterance: &Utterance) -> Result<()> {
        let output = self
            .kind
            .command(utterance)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SpeechError::Command(format!(
                "{} exited with {:?}: {}",
                self.kind.binary(),
                output.status.code(),
                stderr.trim()
            )))
        }
    }

    fn voices_args(&self) -> &'static [&'static str] {
        match self.kind {
            EngineKind::Say => &["-v", "?"],
            EngineKind::EspeakNg => &["--voices"],
            EngineKind::SpdSay => &["-L"],
        }
    }

    // Worker starts on first use; it exits when the engine drops the sender
    fn jobs(&self) -> &Sender<Job> {
        self.jobs.get_or_init(|| {
            let (tx, rx) = mpsc::channel();
            let kind = self.kind;
            std::thread::spawn(move || run_worker(kind, rx));
            tx
        })
    }
}

impl SpeechEngine for CommandEngine {
    fn name(&self) -> &str {
        self.kind.binary()
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        self.jobs()
            .send(Job::Speak(utterance.clone()))
            .map_err(|_| SpeechError::Command("speech worker has stopped".to_string()))
    }

    fn cancel(&self) {
        let _ = self.jobs().send(Job::Cancel);
    }

    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(self.kind.binary())
            .args(self.voices_args())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Command(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match self.kind {
            EngineKind::Say => parse_say_voices(&stdout),
            EngineKind::EspeakNg => parse_espeak_voices(&stdout),
            EngineKind::SpdSay => parse_spd_voices(&stdout),
        })
    }
}

fn run_worker(kind: EngineKind, jobs: Receiver<Job>) {
    let mut current: Option<Child> = None;

    for job in jobs {
        match job {
            Job::Cancel => stop(kind, &mut current),
            Job::Speak(utterance) => {
                let spawned = kind
                    .command(&utterance)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn();
                match spawned {
                    Ok(child) => {
                        debug!("Speaking via {}: {}", kind.binary(), utterance.text);
                        if let Some(mut previous) = current.replace(child) {
                            // Reap a finished predecessor
                            let _ = previous.try_wait();
                        }
                    }
                    Err(e) => warn!("Failed to start {}: {}", kind.binary(), e),
                }
            }
        }
    }

    if let Some(mut child) = current.take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn stop(kind: EngineKind, current: &mut Option<Child>) {
    if let Some(mut child) = current.take() {
        if let Ok(None) = child.try_wait() {
            let _ = child.kill();
        }
        let _ = child.wait();
    }

    // speech-dispatcher keeps speaking after the client exits
    if kind == EngineKind::SpdSay {
        let _ = Command::new("spd-say")
            .arg("-C")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

fn is_installed(binary: &str) -> bool {
    Command::new("which")
        .arg(binary)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Parse `say -v ?` output: `Milena              ru_RU    # Здравствуйте! Меня зовут Милена.`
pub fn parse_say_voices(output: &str) -> Vec<Voice> {
    let Ok(re) = Regex::new(r"^(?P<name>.+?)\s+(?P<lang>[a-z]{2,3}[_-][A-Za-z0-9]+)\s+#") else {
        return Vec::new();
    };

    output
        .lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            Some(Voice::new(caps["name"].trim(), &caps["lang"]))
        })
        .collect()
}

/// Parse `espeak-ng --voices` output (skips the header row)
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            // Pty Language Age/Gender VoiceName File [Other Languages]
            if cols.len() < 5 || cols[0] == "Pty" {
                return None;
            }
            Some(Voice::new(cols[3], cols[1]))
        })
        .collect()
}

/// Parse `spd-say -L` output: `NAME LANGUAGE VARIANT` columns
pub fn parse_spd_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 2 || cols[0] == "NAME" {
                return None;
            }
            Some(Voice::new(cols[0], cols[1]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            language: "ru-RU".to_string(),
            voice: None,
            rate: None,
        }
    }

    #[test]
    fn test_say_args() {
        let engine = CommandEngine::new(EngineKind::Say);
        let mut utt = utterance("Привет");
        utt.voice = Some("Milena".to_string());
        utt.rate = Some(180);
        assert_eq!(
            engine.speak_args(&utt),
            vec!["-v", "Milena", "-r", "180", "Привет"]
        );
    }

    #[test]
    fn test_espeak_args_fall_back_to_language() {
        let engine = CommandEngine::new(EngineKind::EspeakNg);
        assert_eq!(
            engine.speak_args(&utterance("Отчет")),
            vec!["-v", "ru", "--", "Отчет"]
        );
    }

    #[test]
    fn test_spd_args_wait_for_playback() {
        let engine = CommandEngine::new(EngineKind::SpdSay);
        let args = engine.speak_args(&utterance("-dash first"));
        assert_eq!(args, vec!["-w", "-l", "ru", "--", "-dash first"]);
    }

    #[test]
    fn test_parse_say_voices() {
        let output = "\
Alex                en_US    # Most people recognize me by my voice.
Bad News            en_US    # The light you see at the end of the tunnel is the headlamp of a fast approaching train.
Milena              ru_RU    # Здравствуйте! Меня зовут Милена.
";
        let voices = parse_say_voices(output);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1], Voice::new("Bad News", "en-US"));
        assert_eq!(voices[2].name, "Milena");
        assert_eq!(voices[2].language, "ru-RU");
    }

    #[test]
    fn test_parse_espeak_voices() {
        let output = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  en-gb           --/M      English_(Great_Britain) gmw/en           (en 2)
 5  ru              --/M      Russian            zle/ru
";
        let voices = parse_espeak_voices(output);
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0], Voice::new("English_(Great_Britain)", "en-GB"));
        assert_eq!(voices[1], Voice::new("Russian", "ru"));
    }

    #[test]
    fn test_parse_spd_voices() {
        let output = "\
NAME                 LANGUAGE                 VARIANT
ru                   ru                       none
en-us                en-US                    none
";
        let voices = parse_spd_voices(output);
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[1].language, "en-US");
    }

    #[test]
    fn test_engine_name() {
        assert_eq!(CommandEngine::new(EngineKind::Say).name(), "say");
        assert_eq!(CommandEngine::new(EngineKind::SpdSay).kind(), EngineKind::SpdSay);
    }

    #[test]
    fn test_from_choice() {
        assert!(CommandEngine::from_choice(EngineChoice::None).is_none());
        let engine = CommandEngine::from_choice(EngineChoice::Say).unwrap();
        assert_eq!(engine.kind(), EngineKind::Say);
    }
}
