use crate::domain::clock::{minute_of_day, remaining_minutes, warning_threshold, ClockTime};
use crate::domain::{select_current, Priority, Task};
use chrono::{DateTime, Local};
use tracing::{debug, info};
use uuid::Uuid;

/// Progress of one activation of the current task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No warning fired yet
    Armed,
    /// Warning fired, waiting for the window to close
    Warned,
    /// Completion prompt raised or answered
    Resolved,
}

/// Identity of an activation. A rescheduled window counts as a new activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationKey {
    pub task_id: Uuid,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ActivationKey {
    fn of(task: &Task) -> Self {
        Self {
            task_id: task.id,
            start: task.start_time,
            end: task.end_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub key: ActivationKey,
    pub phase: Phase,
}

/// Side effects requested by a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderEvent {
    /// Remaining time dropped into the warning threshold
    Warning { task_id: Uuid, remaining: u32 },
    /// Window closed on an unfinished task; ask whether it is done
    Expired { task_id: Uuid, priority: Priority },
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub current: Option<Task>,
    pub remaining: Option<u32>,
    pub event: Option<ReminderEvent>,
}

/// Per-tick evaluator for the current task.
///
/// Holds no timers of its own: every call re-reads the wall clock passed in,
/// so skipped or late ticks only delay events, never duplicate them.
#[derive(Debug, Default)]
pub struct ReminderEngine {
    activation: Option<Activation>,
}

impl ReminderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.activation.map(|a| a.phase)
    }

    /// Re-select the current task and advance the activation state machine
    pub fn evaluate(&mut self, now: &DateTime<Local>, tasks: &[Task]) -> Evaluation {
        let current = select_current(tasks, now);
        let key = current.map(ActivationKey::of);

        if self.activation.map(|a| a.key) != key {
            if let Some(key) = key {
                debug!(task_id = %key.task_id, start = %key.start, end = %key.end, "new activation");
            }
            self.activation = key.map(|key| Activation {
                key,
                phase: Phase::Armed,
            });
        }

        let (Some(task), Some(activation)) = (current, self.activation.as_mut()) else {
            return Evaluation {
                current: None,
                remaining: None,
                event: None,
            };
        };

        let remaining = remaining_minutes(minute_of_day(now), task.end_time.minutes());
        let threshold = warning_threshold(task.duration_minutes());

        let event = match activation.phase {
            Phase::Armed | Phase::Warned if remaining == 0 && !task.is_completed() => {
                activation.phase = Phase::Resolved;
                info!(task_id = %task.id, title = %task.title, "task window closed");
                Some(ReminderEvent::Expired {
                    task_id: task.id,
                    priority: task.priority,
                })
            }
            Phase::Armed if remaining > 0 && remaining <= threshold => {
                activation.phase = Phase::Warned;
                info!(task_id = %task.id, remaining, threshold, "task ending soon");
                Some(ReminderEvent::Warning {
                    task_id: task.id,
                    remaining,
                })
            }
            _ => None,
        };

        Evaluation {
            current: Some(task.clone()),
            remaining: Some(remaining),
            event,
        }
    }

    /// Mark the activation of `task_id` as answered. An answer for a task
    /// that is no longer current leaves the new activation alone.
    pub fn resolve(&mut self, task_id: Uuid) {
        match self.activation.as_mut() {
            Some(activation) if activation.key.task_id == task_id => {
                activation.phase = Phase::Resolved;
            }
            _ => debug!(task_id = %task_id, "answer for a superseded activation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{at, task};
    use crate::domain::TaskPatch;
    use pretty_assertions::assert_eq;

    fn events(engine: &mut ReminderEngine, tasks: &[Task], times: &[(u32, u32)]) -> Vec<ReminderEvent> {
        times
            .iter()
            .filter_map(|&(h, m)| engine.evaluate(&at(h, m), tasks).event)
            .collect()
    }

    #[test]
    fn test_no_task_no_activation() {
        let mut engine = ReminderEngine::new();
        let eval = engine.evaluate(&at(9, 0), &[]);
        assert_eq!(eval.current, None);
        assert_eq!(eval.remaining, None);
        assert!(engine.phase().is_none());
    }

    #[test]
    fn test_warning_fires_once_then_alarm_once() {
        // 100 minute window -> 10 minute threshold
        let tasks = vec![task("Deep work", "08:00", "09:40")];
        let id = tasks[0].id;
        let mut engine = ReminderEngine::new();

        let eval = engine.evaluate(&at(9, 29), &tasks);
        assert_eq!(eval.remaining, Some(11));
        assert_eq!(eval.event, None);
        assert_eq!(engine.phase(), Some(Phase::Armed));

        let eval = engine.evaluate(&at(9, 30), &tasks);
        assert_eq!(eval.event, Some(ReminderEvent::Warning { task_id: id, remaining: 10 }));
        assert_eq!(engine.phase(), Some(Phase::Warned));

        // Repeated ticks inside the threshold stay quiet
        let later = events(&mut engine, &tasks, &[(9, 30), (9, 31), (9, 32), (9, 39)]);
        assert!(later.is_empty());

        let eval = engine.evaluate(&at(9, 40), &tasks);
        assert_eq!(
            eval.event,
            Some(ReminderEvent::Expired { task_id: id, priority: tasks[0].priority })
        );
        assert_eq!(engine.phase(), Some(Phase::Resolved));

        // Still inside the end minute: no replay
        assert_eq!(engine.evaluate(&at(9, 40), &tasks).event, None);
    }

    #[test]
    fn test_expiry_without_prior_warning() {
        let tasks = vec![task("Quick", "10:00", "10:20")];
        let mut engine = ReminderEngine::new();

        // First tick lands exactly on the end minute (e.g. after sleep)
        let fired = events(&mut engine, &tasks, &[(10, 20)]);
        assert_eq!(fired.len(), 1);
        assert!(matches!(fired[0], ReminderEvent::Expired { .. }));
    }

    #[test]
    fn test_late_start_inside_threshold_warns() {
        let tasks = vec![task("Meeting", "14:00", "15:00")];
        let mut engine = ReminderEngine::new();
        let fired = events(&mut engine, &tasks, &[(14, 55)]);
        assert_eq!(fired.len(), 1);
        assert!(matches!(fired[0], ReminderEvent::Warning { remaining: 5, .. }));
    }

    #[test]
    fn test_switching_tasks_rearms() {
        let tasks = vec![task("A", "09:00", "09:30"), task("B", "09:31", "10:00")];
        let mut engine = ReminderEngine::new();

        let fired = events(&mut engine, &tasks, &[(9, 25), (9, 30), (9, 31), (9, 58)]);
        assert_eq!(fired.len(), 3);
        assert!(matches!(fired[0], ReminderEvent::Warning { task_id, .. } if task_id == tasks[0].id));
        assert!(matches!(fired[1], ReminderEvent::Expired { task_id, .. } if task_id == tasks[0].id));
        assert!(matches!(fired[2], ReminderEvent::Warning { task_id, .. } if task_id == tasks[1].id));
    }

    #[test]
    fn test_gap_resets_activation() {
        let tasks = vec![task("A", "09:00", "09:30")];
        let mut engine = ReminderEngine::new();
        engine.evaluate(&at(9, 10), &tasks);
        assert!(engine.phase().is_some());

        engine.evaluate(&at(9, 45), &tasks);
        assert!(engine.phase().is_none());
    }

    #[test]
    fn test_snoozed_window_can_warn_again() {
        let mut tasks = vec![task("Write", "09:00", "09:30")];
        let mut engine = ReminderEngine::new();

        let fired = events(&mut engine, &tasks, &[(9, 27), (9, 30)]);
        assert_eq!(fired.len(), 2);

        tasks[0].apply(TaskPatch::snooze(15, &at(9, 30))).unwrap();
        engine.evaluate(&at(9, 30), &tasks);
        assert_eq!(engine.phase(), Some(Phase::Armed));

        let fired = events(&mut engine, &tasks, &[(9, 40), (9, 44), (9, 45)]);
        assert_eq!(fired.len(), 2);
        assert!(matches!(fired[0], ReminderEvent::Warning { remaining: 1, .. }));
        assert!(matches!(fired[1], ReminderEvent::Expired { .. }));
    }

    #[test]
    fn test_answer_no_does_not_refire() {
        let mut tasks = vec![task("Email", "11:00", "11:15")];
        let mut engine = ReminderEngine::new();
        assert_eq!(events(&mut engine, &tasks, &[(11, 15)]).len(), 1);

        tasks[0].apply(TaskPatch::completion(false, at(11, 15))).unwrap();
        engine.resolve(tasks[0].id);
        assert!(events(&mut engine, &tasks, &[(11, 15)]).is_empty());
    }

    #[test]
    fn test_resolve_before_expiry_suppresses_alarm() {
        let tasks = vec![task("Read", "12:00", "13:00")];
        let mut engine = ReminderEngine::new();
        engine.evaluate(&at(12, 10), &tasks);
        engine.resolve(tasks[0].id);

        assert!(events(&mut engine, &tasks, &[(12, 55), (13, 0)]).is_empty());
    }

    #[test]
    fn test_skipped_ticks_fire_only_latest_event() {
        let tasks = vec![task("Long", "08:00", "09:00")];
        let mut engine = ReminderEngine::new();
        engine.evaluate(&at(8, 10), &tasks);

        // Machine slept through the whole warning window
        let fired = events(&mut engine, &tasks, &[(9, 0)]);
        assert_eq!(fired.len(), 1);
        assert!(matches!(fired[0], ReminderEvent::Expired { .. }));
    }

    #[test]
    fn test_late_answer_leaves_next_task_armed() {
        let tasks = vec![task("A", "09:00", "10:00"), task("B", "10:01", "10:30")];
        let mut engine = ReminderEngine::new();

        assert_eq!(events(&mut engine, &tasks, &[(10, 0)]).len(), 1);
        engine.evaluate(&at(10, 2), &tasks);

        // A's prompt answered after B took over
        engine.resolve(tasks[0].id);
        assert_eq!(engine.phase(), Some(Phase::Armed));

        let fired = events(&mut engine, &tasks, &[(10, 25), (10, 28), (10, 30)]);
        assert_eq!(fired.len(), 2);
        assert!(matches!(fired[0], ReminderEvent::Warning { task_id, .. } if task_id == tasks[1].id));
        assert!(matches!(fired[1], ReminderEvent::Expired { task_id, .. } if task_id == tasks[1].id));
    }
}
