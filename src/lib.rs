//! Voice Timer - task countdowns with spoken reminders

pub mod board;
pub mod cli;
pub mod config;
pub mod logging;
pub mod speech;
pub mod task;
pub mod timer;
pub mod tui;
