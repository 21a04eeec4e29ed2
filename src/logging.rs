//! Debug logging
//!
//! Off unless `VOICE_TIMER_DEBUG` is set. The TUI owns the terminal, so
//! records go to `debug.log` in the app directory instead of stderr.

use std::fs::File;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::get_app_dir;

pub const DEBUG_ENV: &str = "VOICE_TIMER_DEBUG";
const LOG_FILE: &str = "debug.log";

pub fn is_debug_enabled() -> bool {
    std::env::var(DEBUG_ENV).is_ok()
}

/// Install the global subscriber when debug logging is requested.
/// `RUST_LOG` overrides the default `voice_timer=debug` filter.
pub fn init() -> Result<()> {
    if !is_debug_enabled() {
        return Ok(());
    }

    let path = get_app_dir()?.join(LOG_FILE);
    let file = File::create(&path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voice_timer=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::debug!("Logging to {}", path.display());
    Ok(())
}
