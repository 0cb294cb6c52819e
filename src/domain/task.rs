use super::clock::{window_minutes, ClockTime};
use super::enums::{Priority, TaskStatus};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// A scheduled task with a same-day time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub priority: Priority,
    pub status: TaskStatus,
    completed: bool,
    pub created_at: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Local>>,
}

impl Task {
    pub fn new(fields: NewTask, created_at: DateTime<Local>) -> Result<Self, TaskError> {
        let title = normalize_title(&fields.title)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            start_time: fields.start_time,
            end_time: fields.end_time,
            priority: fields.priority,
            status: fields.status,
            completed: false,
            created_at,
            completed_at: None,
            snoozed_until: None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Set or clear completion; `completed` and `completed_at` always move together
    pub fn set_completion(&mut self, completed_at: Option<DateTime<Local>>) {
        self.completed = completed_at.is_some();
        self.completed_at = completed_at;
    }

    /// Bring `completed_at` back in line with the `completed` flag after a
    /// hand-edited load. The flag wins; a missing timestamp falls back to
    /// `created_at`. Returns whether anything changed.
    pub fn repair_completion(&mut self) -> bool {
        match (self.completed, self.completed_at) {
            (true, None) => {
                self.completed_at = Some(self.created_at);
                true
            }
            (false, Some(_)) => {
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Window length in minutes (negative if the window is inverted)
    pub fn duration_minutes(&self) -> i64 {
        window_minutes(self.start_time, self.end_time)
    }

    /// Whether a snooze is still holding this task back at `now`
    pub fn is_snoozed(&self, now: &DateTime<Local>) -> bool {
        self.snoozed_until.is_some_and(|until| until > *now)
    }

    /// Merge a partial update into this task
    pub fn apply(&mut self, patch: TaskPatch) -> Result<(), TaskError> {
        if let Some(title) = patch.title {
            self.title = normalize_title(&title)?;
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(completion) = patch.completion {
            self.set_completion(completion);
        }
        if let Some(snoozed_until) = patch.snoozed_until {
            self.snoozed_until = snoozed_until;
        }
        Ok(())
    }
}

fn normalize_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Caller-supplied fields for a new task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub priority: Priority,
    pub status: TaskStatus,
}

/// Partial update. `None` leaves a field untouched; for the optional fields
/// `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub completion: Option<Option<DateTime<Local>>>,
    pub snoozed_until: Option<Option<DateTime<Local>>>,
}

impl TaskPatch {
    /// Answer to the completion prompt: "yes" completes, "no" puts the task
    /// back in progress
    pub fn completion(decision: bool, now: DateTime<Local>) -> Self {
        if decision {
            Self {
                completion: Some(Some(now)),
                status: Some(TaskStatus::Completed),
                ..Self::default()
            }
        } else {
            Self {
                completion: Some(None),
                status: Some(TaskStatus::InProgress),
                ..Self::default()
            }
        }
    }

    /// Re-anchor the window to `[now, now + minutes]` and drop any snooze hold
    pub fn snooze(minutes: u32, now: &DateTime<Local>) -> Self {
        let start = ClockTime::of(now);
        let end = ClockTime::clamped(start.minutes() + minutes);
        Self {
            start_time: Some(start),
            end_time: Some(end),
            snoozed_until: Some(None),
            ..Self::default()
        }
    }
}
