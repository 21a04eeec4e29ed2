//! Task data model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::TaskError;

/// Opaque task identifier, unique within a store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string()[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task category; only affects how a task is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Work,
    Personal,
    Study,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Study];

    /// Parse category from its label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "personal" => Some(Self::Personal),
            "study" => Some(Self::Study),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Study => "study",
        }
    }

    /// Next category in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Self::Work => Self::Personal,
            Self::Personal => Self::Study,
            Self::Study => Self::Work,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Work => Self::Study,
            Self::Personal => Self::Work,
            Self::Study => Self::Personal,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named unit of work with a target duration and a live countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub category: Category,
    /// Requested length in seconds
    pub duration: u32,
    /// Seconds left; never above `duration`
    pub remaining_time: u32,
}

impl Task {
    pub fn new(name: &str, duration: u32, category: Category) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.to_string(),
            category,
            duration,
            remaining_time: duration,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    /// Replace every user-editable field and restart the clock
    pub(crate) fn respecify(&mut self, name: &str, duration: u32, category: Category) {
        self.name = name.to_string();
        self.duration = duration;
        self.category = category;
        self.remaining_time = duration;
    }

    /// Count down one second, floored at zero
    pub(crate) fn tick(&mut self) -> u32 {
        self.remaining_time = self.remaining_time.saturating_sub(1);
        self.remaining_time
    }
}

/// Validate a task name, returning the trimmed form
pub fn validate_name(name: &str) -> Result<&str, TaskError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyName);
    }
    Ok(trimmed)
}

/// Parse duration text as a positive number of seconds
pub fn parse_duration(text: &str) -> Result<u32, TaskError> {
    let trimmed = text.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 && n <= i64::from(u32::MAX) => Ok(n as u32),
        _ => Err(TaskError::InvalidDuration(trimmed.to_string())),
    }
}
