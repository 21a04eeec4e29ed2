//! `vtimer run` - headless countdowns

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use crate::board::TaskBoard;
use crate::config::Config;
use crate::speech::{ConsoleEngine, SpeechEngine, Speaker};
use crate::task::{parse_duration, Category, Task};
use crate::timer::TimerEvent;

#[derive(Args)]
pub struct RunArgs {
    /// Tasks as NAME:SECONDS or NAME:SECONDS:CATEGORY (work, personal, study)
    #[arg(required = true)]
    pub tasks: Vec<String>,

    /// Do not enable sound
    #[arg(long)]
    pub mute: bool,

    /// Print utterances instead of speaking them
    #[arg(long, conflicts_with = "mute")]
    pub print_speech: bool,

    /// Print the final task list as JSON
    #[arg(long)]
    pub json: bool,
}

/// One task given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub duration: String,
    pub category: Category,
}

impl TaskSpec {
    /// Parse `NAME:SECONDS[:CATEGORY]`; the name itself may contain colons
    pub fn parse(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').collect();

        if parts.len() >= 3 {
            if let Some(category) = Category::parse(parts[parts.len() - 1]) {
                return Ok(Self {
                    name: parts[..parts.len() - 2].join(":"),
                    duration: parts[parts.len() - 2].to_string(),
                    category,
                });
            }
        }

        if parts.len() >= 2 {
            return Ok(Self {
                name: parts[..parts.len() - 1].join(":"),
                duration: parts[parts.len() - 1].to_string(),
                category: Category::default(),
            });
        }

        bail!("Invalid task '{}': expected NAME:SECONDS[:CATEGORY]", spec)
    }
}

#[derive(Serialize)]
struct TaskJson<'a> {
    id: &'a str,
    name: &'a str,
    category: Category,
    duration: u32,
    remaining_time: u32,
}

impl<'a> From<&'a Task> for TaskJson<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id.as_str(),
            name: &task.name,
            category: task.category,
            duration: task.duration,
            remaining_time: task.remaining_time,
        }
    }
}

pub async fn run(config: &Config, args: RunArgs) -> Result<()> {
    let mut board = if args.print_speech {
        let engine: Arc<dyn SpeechEngine> = Arc::new(ConsoleEngine);
        TaskBoard::new(
            Speaker::new(Some(engine), &config.speech),
            config.timer.restart,
        )
    } else {
        TaskBoard::from_config(config)
    };

    for raw in &args.tasks {
        let spec = TaskSpec::parse(raw)?;
        if board.add(&spec.name, &spec.duration, spec.category).is_none() {
            eprintln!("Skipping '{}': {}", raw, rejection_reason(&spec));
        }
    }

    if board.tasks().is_empty() {
        bail!("No valid tasks to run");
    }

    if !args.mute {
        if !board.speaker().is_available() {
            eprintln!("No text-to-speech engine found; running silently.");
        }
        board.enable_sound();
    }

    let started = board.start_all();
    println!("Started {} timer(s)", started);

    while board.active_countdowns() > 0 {
        tokio::select! {
            event = board.next_event() => {
                let Some(event) = event else { break };
                report(&mut board, event);
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nInterrupted");
                break;
            }
        }
    }

    // Ticks that landed in the same instant as the last completion
    while let Some(event) = board.try_next_event() {
        report(&mut board, event);
    }

    if args.json {
        let tasks: Vec<TaskJson> = board.tasks().iter().map(TaskJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    }

    Ok(())
}

fn report(board: &mut TaskBoard, event: TimerEvent) {
    let task_id = event.task().clone();
    let is_completion = matches!(event, TimerEvent::Completed { .. });

    if !board.handle_event(event) {
        return;
    }

    if is_completion {
        if let Some(message) = board.status_message() {
            println!("✓ {}", message);
        }
    } else if let Some(task) = board.task(&task_id) {
        println!(
            "  {} [{}] {}s left",
            super::truncate(&task.name, 40),
            task.category,
            task.remaining_time
        );
    }
}

fn rejection_reason(spec: &TaskSpec) -> String {
    if spec.name.trim().is_empty() {
        return "name is empty".to_string();
    }
    match parse_duration(&spec.duration) {
        Ok(_) => "rejected".to_string(),
        Err(e) => e.to_string(),
    }
}
