use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::{debug, info};

use super::{CountdownId, RestartPolicy, TimerEvent, TICK};
use crate::task::{Task, TaskId};

struct Countdown {
    id: CountdownId,
    task: TaskId,
    ticker: JoinHandle<()>,
    completion: JoinHandle<()>,
}

impl Countdown {
    fn stop(&self) {
        self.ticker.abort();
        self.completion.abort();
    }

    fn is_finished(&self) -> bool {
        self.ticker.is_finished() && self.completion.is_finished()
    }
}

/// Owns every running countdown and the channel their timers report on.
///
/// Countdown timers run as tokio tasks, so [`Scheduler::start_all`] must be
/// called from inside a runtime.
pub struct Scheduler {
    events_tx: mpsc::UnboundedSender<TimerEvent>,
    events_rx: mpsc::UnboundedReceiver<TimerEvent>,
    live: Vec<Countdown>,
    // Stopped countdowns whose events may still be queued
    cancelled: Vec<Countdown>,
    next_id: u64,
    policy: RestartPolicy,
}

impl Scheduler {
    pub fn new(policy: RestartPolicy) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            events_tx,
            events_rx,
            live: Vec::new(),
            cancelled: Vec::new(),
            next_id: 0,
            policy,
        }
    }

    /// Spawn one countdown per task in the snapshot. Returns how many were
    /// spawned.
    pub fn start_all(&mut self, snapshot: &[Task]) -> usize {
        let start = Instant::now();
        for task in snapshot {
            if self.policy == RestartPolicy::Replace {
                self.cancel(&task.id);
            }
            self.spawn_countdown(task, start);
        }
        info!(
            "Started {} countdown(s), {} running",
            snapshot.len(),
            self.live.len()
        );
        snapshot.len()
    }

    fn spawn_countdown(&mut self, task: &Task, start: Instant) {
        let id = CountdownId(self.next_id);
        self.next_id += 1;

        let ticks = task.duration;
        let tx = self.events_tx.clone();
        let task_id = task.id.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = interval_at(start + TICK, TICK);
            for _ in 0..ticks {
                interval.tick().await;
                let event = TimerEvent::Tick {
                    countdown: id,
                    task: task_id.clone(),
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tx = self.events_tx.clone();
        let task_id = task.id.clone();
        let name = task.name.clone();
        let deadline = start + Duration::from_secs(u64::from(task.duration));
        let completion = tokio::spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(TimerEvent::Completed {
                countdown: id,
                task: task_id,
                name,
            });
        });

        debug!("Spawned {} for task {} ({}s)", id, task.id, task.duration);
        self.live.push(Countdown {
            id,
            task: task.id.clone(),
            ticker,
            completion,
        });
    }

    /// Stop every countdown for `task`. Returns how many were stopped.
    pub fn cancel(&mut self, task: &TaskId) -> usize {
        let (stopped, kept): (Vec<_>, Vec<_>) =
            self.live.drain(..).partition(|c| &c.task == task);
        self.live = kept;

        for countdown in &stopped {
            countdown.stop();
            debug!("Cancelled {} for task {}", countdown.id, task);
        }
        let count = stopped.len();
        self.cancelled.extend(stopped);
        count
    }

    pub fn cancel_all(&mut self) {
        for countdown in self.live.drain(..) {
            countdown.stop();
            self.cancelled.push(countdown);
        }
    }

    pub fn is_running(&self, task: &TaskId) -> bool {
        self.live.iter().any(|c| &c.task == task)
    }

    /// Number of countdowns that have not completed or been cancelled
    pub fn active_count(&self) -> usize {
        self.live.len()
    }

    /// Wait for the next timer event
    pub async fn next_event(&mut self) -> Option<TimerEvent> {
        self.prune_cancelled();
        self.events_rx.recv().await
    }

    /// Next queued timer event, if one is ready
    pub fn try_next_event(&mut self) -> Option<TimerEvent> {
        self.prune_cancelled();
        self.events_rx.try_recv().ok()
    }

    /// Decide whether an event should still take effect.
    ///
    /// Events from cancelled countdowns are rejected. A completion retires
    /// its countdown and stops the ticker; it is accepted only once.
    pub fn accept(&mut self, event: &TimerEvent) -> bool {
        let id = event.countdown();
        if self.cancelled.iter().any(|c| c.id == id) {
            return false;
        }

        match event {
            TimerEvent::Tick { .. } => true,
            TimerEvent::Completed { .. } => {
                let Some(pos) = self.live.iter().position(|c| c.id == id) else {
                    return false;
                };
                let countdown = self.live.remove(pos);
                countdown.ticker.abort();
                debug!("{} completed for task {}", id, countdown.task);
                true
            }
        }
    }

    // Once the queue is empty and a stopped countdown's tasks have exited,
    // nothing from it can arrive any more.
    fn prune_cancelled(&mut self) {
        if !self.cancelled.is_empty() && self.events_rx.is_empty() {
            self.cancelled.retain(|c| !c.is_finished());
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Category;

    async fn advance(secs: f64) {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    fn drain(scheduler: &mut Scheduler) -> Vec<TimerEvent> {
        std::iter::from_fn(|| scheduler.try_next_event()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_then_completion() {
        let mut scheduler = Scheduler::new(RestartPolicy::Stack);
        let task = Task::new("Write report", 3, Category::Work);
        scheduler.start_all(std::slice::from_ref(&task));

        advance(1.5).await;
        let events = drain(&mut scheduler);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TimerEvent::Tick { .. }));

        advance(2.0).await;
        let events = drain(&mut scheduler);
        let ticks = events
            .iter()
            .filter(|e| matches!(e, TimerEvent::Tick { .. }))
            .count();
        assert_eq!(ticks, 2);
        let completed: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, TimerEvent::Completed { .. }))
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(scheduler.accept(completed[0]));
        assert!(!scheduler.accept(completed[0]));
        assert_eq!(scheduler.active_count(), 0);

        advance(5.0).await;
        assert!(drain(&mut scheduler).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_rejects_queued_events() {
        let mut scheduler = Scheduler::new(RestartPolicy::Stack);
        let task = Task::new("Read", 10, Category::Study);
        scheduler.start_all(std::slice::from_ref(&task));

        advance(2.5).await;
        assert!(scheduler.is_running(&task.id));
        assert_eq!(scheduler.cancel(&task.id), 1);
        assert!(!scheduler.is_running(&task.id));

        let queued = drain(&mut scheduler);
        assert_eq!(queued.len(), 2);
        assert!(queued.iter().all(|e| !scheduler.accept(e)));

        advance(20.0).await;
        assert!(drain(&mut scheduler).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stack_policy_keeps_both() {
        let mut scheduler = Scheduler::new(RestartPolicy::Stack);
        let task = Task::new("Gym", 10, Category::Personal);
        scheduler.start_all(std::slice::from_ref(&task));
        scheduler.start_all(std::slice::from_ref(&task));
        assert_eq!(scheduler.active_count(), 2);

        advance(1.5).await;
        let events = drain(&mut scheduler);
        assert_eq!(events.len(), 2);
        assert_ne!(events[0].countdown(), events[1].countdown());
        assert_eq!(events[0].task(), events[1].task());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_policy_keeps_one() {
        let mut scheduler = Scheduler::new(RestartPolicy::Replace);
        let task = Task::new("Gym", 10, Category::Personal);
        scheduler.start_all(std::slice::from_ref(&task));
        scheduler.start_all(std::slice::from_ref(&task));
        assert_eq!(scheduler.active_count(), 1);

        advance(1.5).await;
        let accepted = drain(&mut scheduler)
            .iter()
            .filter(|e| scheduler.accept(e))
            .count();
        assert_eq!(accepted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_on_drop() {
        let mut scheduler = Scheduler::new(RestartPolicy::Stack);
        let tasks = vec![
            Task::new("a", 5, Category::Work),
            Task::new("b", 5, Category::Work),
        ];
        assert_eq!(scheduler.start_all(&tasks), 2);
        scheduler.cancel_all();
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_running(&tasks[0].id));
    }
}
