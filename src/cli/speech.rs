//! `vtimer speech` subcommands

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;
use crate::speech::{
    normalize_language, select_voice, CommandEngine, Phrasebook, SpeechEngine,
    SpeechError, Utterance,
};

#[derive(Subcommand)]
pub enum SpeechCommands {
    /// List voices offered by the speech engine
    #[command(alias = "ls")]
    Voices,

    /// Speak a phrase with the configured language and voice
    Test {
        /// Text to speak; defaults to the sound-enabled confirmation
        text: Option<String>,
    },
}

pub fn run(config: &Config, command: SpeechCommands) -> Result<()> {
    match command {
        SpeechCommands::Voices => list_voices(config),
        SpeechCommands::Test { text } => test_speech(config, text.as_deref()),
    }
}

fn engine(config: &Config) -> Result<CommandEngine> {
    match CommandEngine::from_choice(config.speech.engine) {
        Some(engine) => Ok(engine),
        None => {
            println!("❌ No text-to-speech engine available.");
            println!("\n💡 Install one of:");
            if cfg!(target_os = "macos") {
                println!("  • say (ships with macOS)");
            } else {
                println!("  • espeak-ng: sudo apt install espeak-ng");
                println!("  • speech-dispatcher: sudo apt install speech-dispatcher");
            }
            Err(SpeechError::EngineUnavailable.into())
        }
    }
}

fn list_voices(config: &Config) -> Result<()> {
    let engine = engine(config)?;
    let voices = engine.voices()?;
    let language = normalize_language(&config.speech.language);

    if voices.is_empty() {
        println!("{} reported no voices.", engine.name());
        return Ok(());
    }

    let chosen = select_voice(&voices, &language, config.speech.voice.as_deref());

    println!("🗣  Voices from {}:", engine.name());
    for voice in &voices {
        let marker = if chosen.as_ref() == Some(voice) {
            "→"
        } else {
            "•"
        };
        println!("  {} {} ({})", marker, voice.name, voice.language);
    }
    println!("\nTotal: {} voices", voices.len());

    match chosen {
        Some(voice) => println!("Voice for {}: {}", language, voice.name),
        None => println!("No voice matches {}; the engine default is used", language),
    }

    println!("\n💡 Test a phrase: vtimer speech test \"hello\"");
    Ok(())
}

fn test_speech(config: &Config, text: Option<&str>) -> Result<()> {
    let engine = engine(config)?;
    let language = normalize_language(&config.speech.language);
    let text = match text {
        Some(text) => text.to_string(),
        None => Phrasebook::for_language(&language).sound_enabled(),
    };

    let voices = engine.voices().unwrap_or_default();
    let voice = select_voice(&voices, &language, config.speech.voice.as_deref());

    let utterance = Utterance {
        text,
        language,
        voice: voice.map(|v| v.name),
        rate: config.speech.rate,
    };

    print!("🔊 Speaking '{}'... ", utterance.text);
    std::io::Write::flush(&mut std::io::stdout())?;

    match engine.speak_blocking(&utterance) {
        Ok(()) => {
            println!("✓");
            Ok(())
        }
        Err(e) => {
            println!("✗");
            eprintln!("\n❌ Failed to speak: {}", e);
            eprintln!("\n💡 Troubleshooting:");
            eprintln!("  • Check that your audio device is working");
            eprintln!("  • Run 'vtimer speech voices' to see what the engine offers");
            Err(e.into())
        }
    }
}
