//! Spoken and displayed text, in the session language

use super::primary_language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrasebook {
    Russian,
    English,
}

impl Phrasebook {
    pub fn for_language(tag: &str) -> Self {
        match primary_language(tag).as_str() {
            "ru" => Self::Russian,
            _ => Self::English,
        }
    }

    pub fn sound_enabled(&self) -> String {
        match self {
            Self::Russian => "Звук включен".to_string(),
            Self::English => "Sound enabled".to_string(),
        }
    }

    /// Announcement spoken when a countdown completes
    pub fn time_expired(&self, task: &str) -> String {
        match self {
            Self::Russian => format!("Время для задания {} истекло", task),
            Self::English => format!("Time for task {} has expired", task),
        }
    }

    /// Status line shown when a countdown completes
    pub fn task_completed(&self, task: &str) -> String {
        match self {
            Self::Russian => format!("Задание \"{}\" завершено!", task),
            Self::English => format!("Task \"{}\" completed!", task),
        }
    }
}
