//! Countdown scheduling
//!
//! Every countdown is two independent tokio timers anchored at the same start
//! instant: a one-second ticker and a completion timer. Neither touches the
//! task store. They send [`TimerEvent`]s to the owner of the [`Scheduler`],
//! which applies them in arrival order.

mod scheduler;

pub use scheduler::Scheduler;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::task::TaskId;

/// Interval between countdown ticks
pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountdownId(u64);

impl fmt::Display for CountdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cd{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed for the countdown
    Tick {
        countdown: CountdownId,
        task: TaskId,
    },
    /// The countdown's full duration elapsed; `name` is the task name at start
    Completed {
        countdown: CountdownId,
        task: TaskId,
        name: String,
    },
}

impl TimerEvent {
    pub fn countdown(&self) -> CountdownId {
        match self {
            Self::Tick { countdown, .. } | Self::Completed { countdown, .. } => *countdown,
        }
    }

    pub fn task(&self) -> &TaskId {
        match self {
            Self::Tick { task, .. } | Self::Completed { task, .. } => task,
        }
    }
}

/// What `start_all` does with a task that already has a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Spawn another countdown next to the running ones; they race on the
    /// same remaining time
    #[default]
    Stack,
    /// Cancel running countdowns for the task before spawning a new one
    Replace,
}
