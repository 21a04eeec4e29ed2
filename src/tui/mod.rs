//! Terminal User Interface module

mod app;
mod components;
mod dialogs;
mod home;
mod styles;

pub use app::*;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;

use crate::board::TaskBoard;
use crate::config::Config;

pub async fn run(config: Config) -> Result<()> {
    let board = TaskBoard::from_config(&config);
    if !board.speaker().is_available() {
        tracing::warn!("Starting without speech; install espeak-ng or speech-dispatcher");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(board);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
