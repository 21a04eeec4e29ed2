//! Task board: the single owner of session state
//!
//! Holds the task store, the countdown scheduler, the speaker and the theme
//! flag. User intents come in as method calls; timer callbacks come in as
//! [`TimerEvent`]s through [`TaskBoard::handle_event`]. Rejected input is
//! dropped silently (logged at debug level).

use tracing::{debug, info};

use crate::config::Config;
use crate::speech::{self, Speaker};
use crate::task::{Category, Task, TaskForm, TaskId, TaskStore};
use crate::timer::{RestartPolicy, Scheduler, TimerEvent};

pub struct TaskBoard {
    store: TaskStore,
    scheduler: Scheduler,
    speaker: Speaker,
    dark_mode: bool,
}

impl TaskBoard {
    pub fn new(speaker: Speaker, policy: RestartPolicy) -> Self {
        Self {
            store: TaskStore::new(),
            scheduler: Scheduler::new(policy),
            speaker,
            dark_mode: false,
        }
    }

    /// Board wired to the speech engine and options from `config`
    pub fn from_config(config: &Config) -> Self {
        let engine = speech::engine_from_config(&config.speech);
        let speaker = Speaker::new(engine, &config.speech);
        let mut board = Self::new(speaker, config.timer.restart);
        board.dark_mode = config.ui.dark_mode;
        board
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.list()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.store.status_message()
    }

    pub fn dismiss_status_message(&mut self) {
        self.store.clear_status_message();
    }

    pub fn form(&self) -> &TaskForm {
        self.store.form()
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        self.store.form_mut()
    }

    pub fn editing(&self) -> Option<&TaskId> {
        self.store.editing()
    }

    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.speaker.is_enabled()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_running(&self, id: &TaskId) -> bool {
        self.scheduler.is_running(id)
    }

    pub fn active_countdowns(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn add(&mut self, name: &str, duration_text: &str, category: Category) -> Option<TaskId> {
        self.store
            .add(name, duration_text, category)
            .map_err(|e| debug!("Add rejected: {}", e))
            .ok()
    }

    pub fn begin_edit(&mut self, id: &TaskId) {
        if let Err(e) = self.store.begin_edit(id) {
            debug!("Edit rejected: {}", e);
        }
    }

    pub fn commit_edit(
        &mut self,
        name: &str,
        duration_text: &str,
        category: Category,
    ) -> Option<TaskId> {
        self.store
            .commit_edit(name, duration_text, category)
            .map_err(|e| debug!("Update rejected: {}", e))
            .ok()
    }

    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    /// Add or update from the form fields
    pub fn submit_form(&mut self) -> Option<TaskId> {
        self.store
            .submit_form()
            .map_err(|e| debug!("Form rejected: {}", e))
            .ok()
    }

    /// Remove a task and stop its countdowns
    pub fn delete(&mut self, id: &TaskId) {
        match self.store.delete(id) {
            Ok(task) => {
                let stopped = self.scheduler.cancel(id);
                debug!("Deleted task '{}', stopped {} countdown(s)", task.name, stopped);
            }
            Err(e) => debug!("Delete ignored: {}", e),
        }
    }

    /// Start a countdown for every task currently on the board
    pub fn start_all(&mut self) -> usize {
        let snapshot = self.store.list().to_vec();
        self.scheduler.start_all(&snapshot)
    }

    pub fn enable_sound(&mut self) {
        self.speaker.enable();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub async fn next_event(&mut self) -> Option<TimerEvent> {
        self.scheduler.next_event().await
    }

    pub fn try_next_event(&mut self) -> Option<TimerEvent> {
        self.scheduler.try_next_event()
    }

    /// Apply a timer event. Returns whether anything visible changed.
    pub fn handle_event(&mut self, event: TimerEvent) -> bool {
        if !self.scheduler.accept(&event) {
            return false;
        }

        match event {
            TimerEvent::Tick { task, .. } => {
                let Some(task) = self.store.decrement(&task) else {
                    return false;
                };
                let remaining = task.remaining_time;
                if remaining > 0 && remaining % 2 == 0 {
                    let name = task.name.clone();
                    self.speaker.say(&name);
                }
                true
            }
            TimerEvent::Completed { name, .. } => {
                let phrases = self.speaker.phrases();
                self.speaker.say(&phrases.time_expired(&name));
                self.store.set_status_message(phrases.task_completed(&name));
                info!("Task '{}' completed", name);
                true
            }
        }
    }

    /// Apply every event that is already queued. Returns how many changed
    /// the board.
    pub fn pump(&mut self) -> usize {
        let mut changed = 0;
        while let Some(event) = self.try_next_event() {
            if self.handle_event(event) {
                changed += 1;
            }
        }
        changed
    }
}
